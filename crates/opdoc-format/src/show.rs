use std::fmt::Write as _;

use opdoc_render::DisplayedOperator;
use serde_json::json;

use crate::ReportFormat;

/// What a `show` request resolved to.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShowView<'a> {
    /// Identifier that was asked for; `None` when the path did not match a route.
    pub requested: Option<&'a str>,
    pub operator: Option<&'a DisplayedOperator>,
    pub suggestion: Option<&'a str>,
}

impl ShowView<'_> {
    pub(crate) fn not_found_message(&self) -> String {
        match self.requested {
            Some(identifier) => format!("Nothing to show for '{identifier}'."),
            None => "Nothing to show.".to_string(),
        }
    }
}

/// Render a single operator view as plain text or JSON.
pub fn render_show(view: &ShowView<'_>, format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Plain => Ok(render_plain(view)),
        ReportFormat::Json => {
            let payload = json!({
                "identifier": view.requested,
                "found": view.operator.is_some(),
                "operator": view.operator,
                "suggestion": view.suggestion,
            });
            serde_json::to_string_pretty(&payload)
        }
    }
}

fn render_plain(view: &ShowView<'_>) -> String {
    let mut out = String::new();
    let Some(operator) = view.operator else {
        out.push_str(&view.not_found_message());
        out.push('\n');
        if let Some(suggestion) = view.suggestion {
            let _ = writeln!(out, "Did you mean '{suggestion}'?");
        }
        return out;
    };

    let _ = writeln!(out, "# {}", operator.identifier);
    out.push('\n');
    let _ = writeln!(out, "{}", operator.description);
    out.push('\n');
    let _ = writeln!(out, "Signature: {}", operator.signature);
    if !operator.related.is_empty() {
        let _ = writeln!(out, "Related: {}", operator.related.join(", "));
    }

    for (index, example) in operator.examples.iter().enumerate() {
        out.push('\n');
        let _ = writeln!(
            out,
            "## {}. {} [copyState={}]",
            index + 1,
            example.title,
            example.copy_state
        );
        if let Some(description) = &example.description {
            let _ = writeln!(out, "{description}");
        }
        if let Some(link) = &example.link {
            let _ = writeln!(out, "Sandbox: {link}");
        }
        out.push('\n');
        for line in example.code.trim_end_matches('\n').lines() {
            if line.is_empty() {
                out.push('\n');
            } else {
                let _ = writeln!(out, "    {line}");
            }
        }
    }
    out
}
