use std::fmt::Write as _;

use serde::Serialize;
use serde_json::json;

use crate::ReportFormat;

/// One line of `opdoc list`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ListEntry {
    pub identifier: String,
    /// First line of the operator description.
    pub summary: String,
    pub examples: usize,
}

/// Menu group with each entry resolved against the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MenuGroupView {
    pub title: String,
    pub entries: Vec<MenuEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    pub identifier: String,
    pub resolved: bool,
}

pub fn render_list(entries: &[ListEntry], format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Json => serde_json::to_string_pretty(&json!({ "operators": entries })),
        ReportFormat::Plain => {
            if entries.is_empty() {
                return Ok("No operators matched.\n".to_string());
            }
            let width = entries
                .iter()
                .map(|entry| entry.identifier.chars().count())
                .max()
                .unwrap_or(0);
            let mut out = String::new();
            for entry in entries {
                let _ = writeln!(
                    out,
                    "{:<width$}  {}",
                    entry.identifier,
                    entry.summary,
                    width = width
                );
            }
            Ok(out)
        }
    }
}

pub fn render_menu(
    groups: &[MenuGroupView],
    format: ReportFormat,
) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Json => serde_json::to_string_pretty(&json!({ "groups": groups })),
        ReportFormat::Plain => {
            let mut out = String::new();
            for (index, group) in groups.iter().enumerate() {
                if index > 0 {
                    out.push('\n');
                }
                let _ = writeln!(out, "{}", group.title);
                for entry in &group.entries {
                    if entry.resolved {
                        let _ = writeln!(out, "  {}", entry.identifier);
                    } else {
                        let _ = writeln!(out, "  {} (undocumented)", entry.identifier);
                    }
                }
            }
            Ok(out)
        }
    }
}
