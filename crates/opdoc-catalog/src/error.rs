use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a catalog. Lookups never fail.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse catalog")]
    Parse(#[from] toml::de::Error),
    #[error("catalog validation failed:\n{}", format_issues(.0))]
    Validation(Vec<CatalogIssue>),
}

/// Authoring defect found while validating a catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogIssue {
    pub identifier: String,
    pub message: String,
}

impl CatalogIssue {
    pub(crate) fn new(identifier: &str, message: impl Into<String>) -> Self {
        CatalogIssue {
            identifier: identifier.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.identifier, self.message)
    }
}

fn format_issues(issues: &[CatalogIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("- {issue}"))
        .collect::<Vec<_>>()
        .join("\n")
}
