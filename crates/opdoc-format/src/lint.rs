use std::fmt::Write as _;

use opdoc_config::{LintRule, SeverityLevel};
use serde_json::json;

use crate::ReportFormat;

/// Single lint finding against one operator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LintFinding {
    pub rule: LintRule,
    pub operator: String,
    pub message: String,
    pub severity: SeverityLevel,
}

/// Findings for a whole catalog, sorted by operator then rule.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LintReport {
    pub findings: Vec<LintFinding>,
    pub operators_checked: usize,
    pub error_count: usize,
    pub warning_count: usize,
}

pub fn render_lint(report: &LintReport, format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Json => {
            let payload = json!({
                "summary": {
                    "operators": report.operators_checked,
                    "errors": report.error_count,
                    "warnings": report.warning_count,
                },
                "findings": report
                    .findings
                    .iter()
                    .map(|finding| {
                        json!({
                            "rule": finding.rule.as_str(),
                            "operator": finding.operator,
                            "severity": finding.severity.as_str(),
                            "message": finding.message,
                        })
                    })
                    .collect::<Vec<_>>(),
            });
            serde_json::to_string_pretty(&payload)
        }
        ReportFormat::Plain => {
            if report.findings.is_empty() {
                return Ok(format!(
                    "No issues found in {} operators.\n",
                    report.operators_checked
                ));
            }
            let mut out = String::new();
            for finding in &report.findings {
                let _ = writeln!(
                    out,
                    "{}[{}] {}: {}",
                    finding.severity, finding.rule, finding.operator, finding.message
                );
            }
            let _ = writeln!(
                out,
                "\nChecked {} operators: {} errors, {} warnings",
                report.operators_checked, report.error_count, report.warning_count
            );
            Ok(out)
        }
    }
}
