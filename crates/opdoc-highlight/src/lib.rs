//! Syntax highlighting for operator code examples.
//!
//! [`highlight`] is a pure function from source text to presentational markup.
//! Every fragment of the input is HTML-escaped before it is wrapped in a
//! `<span class="hljs-…">`, so the result can be inserted into a page as-is.
//! [`SafeMarkup`] can only be produced here; any other text must go through
//! [`escape_html`] before it reaches a page.

mod keywords;
mod lexer;

pub use lexer::{tokenize, Token, TokenKind};

use std::fmt;

use lexer::{template_parts, TemplatePart};
use serde::{Serialize, Serializer};

/// Template literals nested deeper than this are emitted as plain string text.
const MAX_TEMPLATE_DEPTH: usize = 32;

/// Source language of the examples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Language {
    #[default]
    JavaScript,
    TypeScript,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "javascript" | "js" => Ok(Language::JavaScript),
            "typescript" | "ts" => Ok(Language::TypeScript),
            _ => Err(()),
        }
    }
}

/// Highlighter output. Escaped by construction and safe to embed without further sanitizing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SafeMarkup(String);

impl SafeMarkup {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SafeMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for SafeMarkup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Highlight `code` as `language`.
pub fn highlight(code: &str, language: Language) -> SafeMarkup {
    let mut out = String::with_capacity(code.len() * 2);
    render_into(&mut out, code, language, 0);
    SafeMarkup(out)
}

/// Escape the characters that are structurally significant in HTML.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_into(&mut out, text);
    out
}

fn render_into(out: &mut String, code: &str, language: Language, depth: usize) {
    for token in tokenize(code, language) {
        match token.kind {
            TokenKind::Template if depth >= MAX_TEMPLATE_DEPTH => {
                push_span(out, "hljs-string", token.text)
            }
            TokenKind::Template => render_template(out, token.text, language, depth + 1),
            kind => match kind.class() {
                Some(class) => push_span(out, class, token.text),
                None => escape_into(out, token.text),
            },
        }
    }
}

fn render_template(out: &mut String, text: &str, language: Language, depth: usize) {
    out.push_str("<span class=\"hljs-string\">");
    for part in template_parts(text) {
        match part {
            TemplatePart::Text(text) => escape_into(out, text),
            TemplatePart::Subst { inner, closed } => {
                out.push_str("<span class=\"hljs-subst\">${");
                render_into(out, inner, language, depth);
                if closed {
                    out.push('}');
                }
                out.push_str("</span>");
            }
        }
    }
    out.push_str("</span>");
}

fn push_span(out: &mut String, class: &str, text: &str) {
    out.push_str("<span class=\"");
    out.push_str(class);
    out.push_str("\">");
    escape_into(out, text);
    out.push_str("</span>");
}

fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
}
