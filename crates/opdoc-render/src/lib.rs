//! Display state for one operator page.
//!
//! A [`Viewer`] resolves identifiers against a shared [`Catalog`] and holds a
//! transient, highlighted copy of the selected record. Copying an example is
//! split into [`Viewer::request_copy`] and [`Viewer::complete_copy`] so the
//! clipboard write can happen outside the state machine; every navigation
//! bumps a generation counter and tickets from older generations are dropped.

mod clipboard;
mod route;

pub use clipboard::{Clipboard, ClipboardError, CommandClipboard, MemoryClipboard, WriterClipboard};
pub use route::{encode_segment, operator_path, parse_route, Route};

use std::sync::Arc;

use opdoc_catalog::{Catalog, CopyState, Example, OperatorRecord};
use opdoc_highlight::{highlight, Language, SafeMarkup};
use serde::Serialize;
use tracing::debug;

/// Identifier shown when navigating to the site root.
pub const DEFAULT_OPERATOR: &str = "defer";

/// A catalog record prepared for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayedOperator {
    pub identifier: String,
    pub description: String,
    pub signature: String,
    pub related: Vec<String>,
    pub examples: Vec<DisplayedExample>,
}

impl DisplayedOperator {
    /// Derive a fresh display copy. Every example starts out not copied.
    pub fn from_record(identifier: &str, record: &OperatorRecord, language: Language) -> Self {
        DisplayedOperator {
            identifier: identifier.to_string(),
            description: record.description.clone(),
            signature: record.signature.clone(),
            related: record.related.clone(),
            examples: record
                .examples
                .iter()
                .map(|example| DisplayedExample::from_example(example, language))
                .collect(),
        }
    }
}

/// One example with its highlighted markup and transient copy state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayedExample {
    pub title: String,
    /// Literal source. This is what gets copied, never the markup.
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub copy_state: CopyState,
    pub safe_code: SafeMarkup,
}

impl DisplayedExample {
    fn from_example(example: &Example, language: Language) -> Self {
        DisplayedExample {
            title: example.title.clone(),
            code: example.code.clone(),
            description: example.description.clone(),
            link: example.link.clone(),
            copy_state: CopyState::NotCopied,
            safe_code: highlight(&example.code, language),
        }
    }
}

/// A pending clipboard write issued by [`Viewer::request_copy`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CopyTicket {
    generation: u64,
    index: usize,
    code: String,
}

impl CopyTicket {
    /// Literal text to place on the clipboard.
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Result of settling a copy request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    /// The write failed; state is unchanged.
    Failed,
    /// A navigation happened after the ticket was issued.
    Superseded,
    /// Nothing is displayed at that index.
    NoSuchExample,
}

/// Navigation and copy state machine for a single view.
#[derive(Clone, Debug)]
pub struct Viewer {
    catalog: Arc<Catalog>,
    language: Language,
    default_operator: String,
    current: Option<String>,
    generation: u64,
    displayed: Option<DisplayedOperator>,
}

impl Viewer {
    pub fn new(catalog: Arc<Catalog>, language: Language) -> Self {
        Viewer {
            catalog,
            language,
            default_operator: DEFAULT_OPERATOR.to_string(),
            current: None,
            generation: 0,
            displayed: None,
        }
    }

    pub fn with_default_operator(mut self, identifier: impl Into<String>) -> Self {
        self.default_operator = identifier.into();
        self
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn default_operator(&self) -> &str {
        &self.default_operator
    }

    pub fn current_identifier(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The displayed record, `None` for the empty state.
    pub fn displayed(&self) -> Option<&DisplayedOperator> {
        self.displayed.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.displayed
            .as_ref()
            .map(|operator| operator.description.as_str())
    }

    pub fn examples(&self) -> &[DisplayedExample] {
        self.displayed
            .as_ref()
            .map(|operator| operator.examples.as_slice())
            .unwrap_or_default()
    }

    /// Display `identifier`. Unknown identifiers leave the view empty.
    pub fn navigate(&mut self, identifier: &str) -> Option<&DisplayedOperator> {
        self.generation += 1;
        self.current = Some(identifier.to_string());
        self.displayed = self
            .catalog
            .lookup(identifier)
            .map(|record| DisplayedOperator::from_record(identifier, record, self.language));

        debug!(
            identifier,
            generation = self.generation,
            found = self.displayed.is_some(),
            "navigated"
        );
        self.displayed.as_ref()
    }

    /// Route `path` and display the result.
    pub fn navigate_path(&mut self, path: &str) -> Option<&DisplayedOperator> {
        let route = parse_route(path);
        match route.identifier(&self.default_operator).map(str::to_string) {
            Some(identifier) => self.navigate(&identifier),
            None => {
                self.generation += 1;
                self.current = None;
                self.displayed = None;
                debug!(path, generation = self.generation, "unmatched path");
                None
            }
        }
    }

    /// Issue a ticket for copying example `index` of the current display.
    pub fn request_copy(&self, index: usize) -> Option<CopyTicket> {
        let example = self.examples().get(index)?;
        Some(CopyTicket {
            generation: self.generation,
            index,
            code: example.code.clone(),
        })
    }

    /// Apply the result of a clipboard write.
    pub fn complete_copy(
        &mut self,
        ticket: CopyTicket,
        result: Result<(), ClipboardError>,
    ) -> CopyOutcome {
        if ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding superseded copy"
            );
            return CopyOutcome::Superseded;
        }
        if let Err(err) = result {
            debug!(index = ticket.index, error = %err, "copy failed");
            return CopyOutcome::Failed;
        }

        let example = self
            .displayed
            .as_mut()
            .and_then(|operator| operator.examples.get_mut(ticket.index));
        match example {
            Some(example) => {
                example.copy_state = CopyState::Copied;
                debug!(index = ticket.index, "copied");
                CopyOutcome::Copied
            }
            None => CopyOutcome::NoSuchExample,
        }
    }

    /// Request, write, and settle a copy in one step.
    pub fn copy(&mut self, index: usize, clipboard: &mut dyn Clipboard) -> CopyOutcome {
        let Some(ticket) = self.request_copy(index) else {
            return CopyOutcome::NoSuchExample;
        };
        let result = clipboard.write_text(ticket.code());
        self.complete_copy(ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opdoc_catalog::MenuGroup;

    fn catalog() -> Arc<Catalog> {
        let record = OperatorRecord {
            description: "first".into(),
            signature: "first()".into(),
            related: Vec::new(),
            examples: vec![Example {
                title: "t".into(),
                code: "a < b".into(),
                description: None,
                link: None,
                copy_state: CopyState::Copied,
            }],
        };
        let catalog = Catalog::from_records([("first".to_string(), record)], Vec::<MenuGroup>::new())
            .expect("catalog");
        Arc::new(catalog)
    }

    #[test]
    fn authored_copy_state_is_reset_on_display() {
        let mut viewer = Viewer::new(catalog(), Language::JavaScript);
        viewer.navigate("first");
        assert_eq!(viewer.examples()[0].copy_state, CopyState::NotCopied);
        assert_eq!(viewer.examples()[0].safe_code.as_str(), "a &lt; b");
    }

    #[test]
    fn navigation_bumps_generation() {
        let mut viewer = Viewer::new(catalog(), Language::JavaScript);
        assert_eq!(viewer.generation(), 0);
        viewer.navigate("first");
        viewer.navigate("missing");
        assert_eq!(viewer.generation(), 2);
        assert_eq!(viewer.current_identifier(), Some("missing"));
        assert!(viewer.displayed().is_none());
    }

    #[test]
    fn request_copy_out_of_range() {
        let mut viewer = Viewer::new(catalog(), Language::JavaScript);
        viewer.navigate("first");
        assert!(viewer.request_copy(1).is_none());
        let mut clipboard = MemoryClipboard::new();
        assert_eq!(viewer.copy(3, &mut clipboard), CopyOutcome::NoSuchExample);
        assert!(clipboard.writes().is_empty());
    }
}
