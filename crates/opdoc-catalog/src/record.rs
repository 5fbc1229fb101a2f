use std::fmt;

use serde::{Deserialize, Serialize};

/// One documented operator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorRecord {
    pub description: String,
    pub signature: String,
    /// Identifiers of other catalog entries. Not checked for existence.
    #[serde(default)]
    pub related: Vec<String>,
    pub examples: Vec<Example>,
}

/// One illustrative code sample attached to an operator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Example {
    pub title: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default)]
    pub copy_state: CopyState,
}

/// Whether an example's code has been copied since it was last displayed.
///
/// Serialized as the strings `"0"` and `"1"`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CopyState {
    #[default]
    #[serde(rename = "0")]
    NotCopied,
    #[serde(rename = "1")]
    Copied,
}

impl CopyState {
    pub fn as_str(self) -> &'static str {
        match self {
            CopyState::NotCopied => "0",
            CopyState::Copied => "1",
        }
    }

    pub fn is_copied(self) -> bool {
        matches!(self, CopyState::Copied)
    }
}

impl fmt::Display for CopyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authored navigation group. Not derived from the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuGroup {
    pub title: String,
    pub operators: Vec<String>,
}
