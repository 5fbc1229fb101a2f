//! High-level operations shared by opdoc commands.

mod export;
mod lint;

pub use export::{ExportOptions, ExportOutcome};
pub use lint::{LintOptions, LintOutcome};
pub use opdoc_catalog::CatalogError;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use opdoc_catalog::{Catalog, CopyState};
use opdoc_config::Config;
use opdoc_format::{
    render_list, render_menu, render_page, render_show, LinkStyle, ListEntry, MenuEntry,
    MenuGroupView, Page, ReportFormat, ShowFormat, ShowView,
};
use opdoc_highlight::Language;
use opdoc_render::{
    Clipboard, ClipboardError, CommandClipboard, CopyOutcome as ViewerCopyOutcome, Viewer,
    WriterClipboard,
};
use regex::RegexBuilder;
use thiserror::Error;
use tracing::debug;

/// Errors surfaced by operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("{}", unknown_operator_message(.identifier, .suggestion))]
    UnknownOperator {
        identifier: String,
        suggestion: Option<String>,
    },
    #[error("operator '{identifier}' has no example {number}")]
    MissingExample { identifier: String, number: usize },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
    #[error("I/O error on {path}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to serialize output")]
    Serialize(#[from] serde_json::Error),
}

fn unknown_operator_message(identifier: &str, suggestion: &Option<String>) -> String {
    match suggestion {
        Some(suggestion) => {
            format!("operator '{identifier}' is not documented (did you mean '{suggestion}'?)")
        }
        None => format!("operator '{identifier}' is not documented"),
    }
}

/// What `show` should display.
#[derive(Clone, Debug)]
pub enum ShowTarget {
    Identifier(String),
    /// A navigation path such as `/operator/of`.
    Path(String),
}

#[derive(Clone, Debug)]
pub struct ShowOptions {
    pub target: ShowTarget,
    pub format: ShowFormat,
}

#[derive(Clone, Debug)]
pub struct ShowOutcome {
    pub rendered: String,
    pub identifier: Option<String>,
    pub found: bool,
    pub suggestion: Option<String>,
}

#[derive(Clone, Debug)]
pub struct CopyOptions {
    pub identifier: String,
    /// 1-based example number.
    pub example: usize,
    /// Write to stdout even when a clipboard command is configured.
    pub force_stdout: bool,
}

#[derive(Clone, Debug)]
pub struct CopyOutcome {
    pub identifier: String,
    pub example: usize,
    pub title: String,
    pub bytes: usize,
    pub copy_state: CopyState,
}

#[derive(Clone, Debug)]
pub struct ListOptions {
    pub filter: Option<String>,
    pub format: ReportFormat,
}

#[derive(Clone, Debug)]
pub struct ListOutcome {
    pub entries: Vec<ListEntry>,
    pub rendered: String,
}

#[derive(Clone, Debug)]
pub struct MenuOptions {
    pub format: ReportFormat,
}

#[derive(Clone, Debug)]
pub struct MenuOutcome {
    pub groups: Vec<MenuGroupView>,
    pub unresolved: usize,
    pub rendered: String,
}

/// Operation bundle over one loaded catalog.
pub struct Operations {
    config: Config,
    catalog: Arc<Catalog>,
    language: Language,
}

impl Operations {
    /// Load the configured catalog, or the embedded one when none is configured.
    pub fn new(config: Config) -> Result<Self, OperationError> {
        let catalog = match &config.catalog.path {
            Some(path) => {
                debug!(path = %path.display(), "loading catalog from disk");
                Arc::new(Catalog::from_path(path)?)
            }
            None => Catalog::embedded()?,
        };
        Ok(Self::with_catalog(config, catalog))
    }

    /// Use an already-loaded catalog.
    pub fn with_catalog(config: Config, catalog: Arc<Catalog>) -> Self {
        let language = config.site.language.parse().unwrap_or_default();
        Self {
            config,
            catalog,
            language,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Fresh viewer over the shared catalog.
    pub fn viewer(&self) -> Viewer {
        Viewer::new(Arc::clone(&self.catalog), self.language)
            .with_default_operator(self.config.site.default_operator.clone())
    }

    /// Render one operator. Unknown identifiers render the empty view.
    pub fn show(&self, options: ShowOptions) -> Result<ShowOutcome, OperationError> {
        let mut viewer = self.viewer();
        match &options.target {
            ShowTarget::Identifier(identifier) => {
                viewer.navigate(identifier);
            }
            ShowTarget::Path(path) => {
                viewer.navigate_path(path);
            }
        }

        let identifier = viewer.current_identifier().map(str::to_string);
        let found = viewer.displayed().is_some();
        let suggestion = match (&identifier, found) {
            (Some(identifier), false) => self.catalog.suggest(identifier).map(str::to_string),
            _ => None,
        };

        let view = ShowView {
            requested: identifier.as_deref(),
            operator: viewer.displayed(),
            suggestion: suggestion.as_deref(),
        };
        let rendered = match options.format {
            ShowFormat::Plain => render_show(&view, ReportFormat::Plain)?,
            ShowFormat::Json => render_show(&view, ReportFormat::Json)?,
            ShowFormat::Html => {
                let menu = self.menu_view();
                render_page(&Page {
                    site_title: &self.config.site.title,
                    language: self.language,
                    menu: &menu,
                    view,
                    links: LinkStyle::Route,
                })
            }
        };

        Ok(ShowOutcome {
            rendered,
            identifier,
            found,
            suggestion,
        })
    }

    /// Copy one example through the configured clipboard.
    pub fn copy(&self, options: CopyOptions) -> Result<CopyOutcome, OperationError> {
        let mut clipboard = self.clipboard(options.force_stdout);
        self.copy_into(options, clipboard.as_mut())
    }

    /// Copy one example into `clipboard`.
    pub fn copy_into(
        &self,
        options: CopyOptions,
        clipboard: &mut dyn Clipboard,
    ) -> Result<CopyOutcome, OperationError> {
        let CopyOptions {
            identifier,
            example,
            ..
        } = options;

        let mut viewer = self.viewer();
        if viewer.navigate(&identifier).is_none() {
            let suggestion = self.catalog.suggest(&identifier).map(str::to_string);
            return Err(OperationError::UnknownOperator {
                identifier,
                suggestion,
            });
        }

        let ticket = example
            .checked_sub(1)
            .and_then(|index| viewer.request_copy(index));
        let Some(ticket) = ticket else {
            return Err(OperationError::MissingExample {
                identifier,
                number: example,
            });
        };
        let index = ticket.index();
        let bytes = ticket.code().len();

        clipboard.write_text(ticket.code())?;
        match viewer.complete_copy(ticket, Ok(())) {
            ViewerCopyOutcome::Copied => {}
            other => debug!(?other, "copy was not recorded"),
        }

        let displayed = &viewer.examples()[index];
        Ok(CopyOutcome {
            identifier,
            example,
            title: displayed.title.clone(),
            bytes,
            copy_state: displayed.copy_state,
        })
    }

    /// Clipboard selected by configuration.
    pub fn clipboard(&self, force_stdout: bool) -> Box<dyn Clipboard> {
        if !force_stdout {
            if let Some(command) = self
                .config
                .clipboard
                .command
                .as_deref()
                .and_then(CommandClipboard::from_argv)
            {
                debug!(program = command.program(), "using clipboard command");
                return Box::new(command);
            }
        }
        Box::new(WriterClipboard::stdout())
    }

    /// List documented operators, optionally filtered by a case-insensitive regex.
    pub fn list(&self, options: ListOptions) -> Result<ListOutcome, OperationError> {
        let filter = match &options.filter {
            Some(pattern) => Some(
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .size_limit(1024 * 100)
                    .build()
                    .map_err(|err| OperationError::InvalidInput(err.to_string()))?,
            ),
            None => None,
        };

        let entries: Vec<ListEntry> = self
            .catalog
            .iter()
            .filter(|(identifier, _)| {
                filter
                    .as_ref()
                    .map(|regex| regex.is_match(identifier))
                    .unwrap_or(true)
            })
            .map(|(identifier, record)| ListEntry {
                identifier: identifier.to_string(),
                summary: record
                    .description
                    .lines()
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string(),
                examples: record.examples.len(),
            })
            .collect();

        let rendered = render_list(&entries, options.format)?;
        Ok(ListOutcome { entries, rendered })
    }

    /// The navigation menu with each entry resolved against the catalog.
    pub fn menu(&self, options: MenuOptions) -> Result<MenuOutcome, OperationError> {
        let groups = self.menu_view();
        let unresolved = groups
            .iter()
            .flat_map(|group| &group.entries)
            .filter(|entry| !entry.resolved)
            .count();
        let rendered = render_menu(&groups, options.format)?;
        Ok(MenuOutcome {
            groups,
            unresolved,
            rendered,
        })
    }

    pub(crate) fn menu_view(&self) -> Vec<MenuGroupView> {
        self.catalog
            .menu()
            .iter()
            .map(|group| MenuGroupView {
                title: group.title.clone(),
                entries: group
                    .operators
                    .iter()
                    .map(|identifier| MenuEntry {
                        identifier: identifier.clone(),
                        resolved: self.catalog.contains(identifier),
                    })
                    .collect(),
            })
            .collect()
    }

    /// Run catalog lint rules.
    pub fn lint(&self, options: LintOptions) -> Result<LintOutcome, OperationError> {
        lint::run(&self.config, &self.catalog, options)
    }

    /// Write the catalog as a static site.
    pub fn export(&self, options: ExportOptions) -> Result<ExportOutcome, OperationError> {
        export::run(self, options)
    }
}
