//! Static catalog of documented operators.
//!
//! The catalog maps an operator identifier to exactly one [`OperatorRecord`]
//! and is immutable once loaded. The reference catalog ships embedded in the
//! binary and is parsed once per process; alternative catalogs with the same
//! TOML layout can be loaded from disk.

mod error;
mod record;

pub use error::{CatalogError, CatalogIssue};
pub use record::{CopyState, Example, MenuGroup, OperatorRecord};

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use serde::Deserialize;
use strsim::normalized_levenshtein;

/// TOML source of the reference catalog.
pub const EMBEDDED_CATALOG: &str = include_str!("../data/catalog.toml");

/// Minimum similarity for an identifier to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.6;

static EMBEDDED: OnceLock<Arc<Catalog>> = OnceLock::new();

/// Immutable mapping from operator identifier to its documentation record.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    operators: BTreeMap<String, OperatorRecord>,
    menu: Vec<MenuGroup>,
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    menu: Vec<MenuGroup>,
    #[serde(default)]
    operators: BTreeMap<String, OperatorRecord>,
}

impl Catalog {
    /// The reference catalog, parsed on first use and shared afterwards.
    pub fn embedded() -> Result<Arc<Catalog>, CatalogError> {
        if let Some(catalog) = EMBEDDED.get() {
            return Ok(Arc::clone(catalog));
        }
        let parsed = Arc::new(Catalog::from_toml_str(EMBEDDED_CATALOG)?);
        Ok(Arc::clone(EMBEDDED.get_or_init(|| parsed)))
    }

    /// Parse and validate a catalog document.
    pub fn from_toml_str(contents: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = toml::from_str(contents)?;
        let catalog = Catalog {
            operators: document.operators,
            menu: document.menu,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Read a catalog document from disk.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Catalog::from_toml_str(&contents)
    }

    /// Assemble a catalog from already-built records, applying the same checks as parsing.
    pub fn from_records(
        operators: impl IntoIterator<Item = (String, OperatorRecord)>,
        menu: Vec<MenuGroup>,
    ) -> Result<Self, CatalogError> {
        let catalog = Catalog {
            operators: operators.into_iter().collect(),
            menu,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Look up an operator. Unknown identifiers are a normal outcome.
    pub fn lookup(&self, identifier: &str) -> Option<&OperatorRecord> {
        self.operators.get(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.operators.contains_key(identifier)
    }

    /// Identifiers in lexical order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.operators.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OperatorRecord)> {
        self.operators
            .iter()
            .map(|(identifier, record)| (identifier.as_str(), record))
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    pub fn menu(&self) -> &[MenuGroup] {
        &self.menu
    }

    /// Closest known identifier to `identifier`, if any is similar enough.
    pub fn suggest(&self, identifier: &str) -> Option<&str> {
        if identifier.is_empty() || self.contains(identifier) {
            return None;
        }
        let needle = identifier.to_lowercase();
        self.identifiers()
            .map(|candidate| {
                let score = normalized_levenshtein(&needle, &candidate.to_lowercase());
                (candidate, score)
            })
            .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(candidate, _)| candidate)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let mut issues = Vec::new();
        for (identifier, record) in &self.operators {
            if identifier.trim().is_empty() {
                issues.push(CatalogIssue::new(identifier, "identifier cannot be blank"));
            }
            if record.description.trim().is_empty() {
                issues.push(CatalogIssue::new(identifier, "description cannot be empty"));
            }
            for (idx, example) in record.examples.iter().enumerate() {
                if example.title.trim().is_empty() {
                    issues.push(CatalogIssue::new(
                        identifier,
                        format!("example {} has an empty title", idx + 1),
                    ));
                }
                if example.code.trim().is_empty() {
                    issues.push(CatalogIssue::new(
                        identifier,
                        format!("example {} has no code", idx + 1),
                    ));
                }
            }
        }
        for group in &self.menu {
            if group.title.trim().is_empty() {
                issues.push(CatalogIssue::new("menu", "group title cannot be empty"));
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(CatalogError::Validation(issues))
        }
    }
}
