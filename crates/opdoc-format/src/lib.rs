//! Output formatters for opdoc commands.
//!
//! Formatters only arrange text. Highlighted code arrives as
//! [`opdoc_highlight::SafeMarkup`] and is the only content inserted into HTML
//! without escaping.

mod html;
mod lint;
mod listing;
mod show;

pub use html::{
    export_file_name, render_page, render_redirect, LinkStyle, Page, COPY_SCRIPT, STYLESHEET,
};
pub use lint::{render_lint, LintFinding, LintReport};
pub use listing::{render_list, render_menu, ListEntry, MenuEntry, MenuGroupView};
pub use show::{render_show, ShowView};

/// Output format for a single operator view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShowFormat {
    Plain,
    Json,
    Html,
}

/// Output format for listings and reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    Plain,
    Json,
}
