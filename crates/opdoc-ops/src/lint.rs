use opdoc_catalog::Catalog;
use opdoc_config::{Config, LintRule, SeverityLevel};
use opdoc_format::{render_lint, LintFinding, LintReport, ReportFormat};
use rayon::prelude::*;
use tracing::debug;

use crate::OperationError;

#[derive(Clone, Debug)]
pub struct LintOptions {
    pub format: ReportFormat,
}

#[derive(Clone, Debug)]
pub struct LintOutcome {
    pub report: LintReport,
    pub rendered: String,
    /// 1 when any finding has error severity.
    pub exit_code: i32,
}

#[derive(Clone, Copy)]
struct ActiveRule {
    rule: LintRule,
    severity: SeverityLevel,
    executor: RuleExecutor,
}

type RuleExecutor = fn(&Catalog) -> Vec<RuleFinding>;

#[derive(Clone)]
struct RuleFinding {
    operator: String,
    message: String,
}

pub(crate) fn run(
    config: &Config,
    catalog: &Catalog,
    options: LintOptions,
) -> Result<LintOutcome, OperationError> {
    let active_rules = build_active_rules(config);
    debug!(rules = active_rules.len(), "running catalog lint");

    let mut findings: Vec<LintFinding> = active_rules
        .par_iter()
        .flat_map_iter(|active| {
            (active.executor)(catalog)
                .into_iter()
                .filter(|finding| !config.lint.is_ignored(&finding.operator, active.rule))
                .map(|finding| LintFinding {
                    rule: active.rule,
                    operator: finding.operator,
                    message: finding.message,
                    severity: active.severity,
                })
                .collect::<Vec<_>>()
        })
        .collect();

    findings.sort_by(|a, b| {
        a.operator
            .cmp(&b.operator)
            .then_with(|| a.rule.cmp(&b.rule))
            .then_with(|| a.message.cmp(&b.message))
    });

    let (error_count, warning_count) =
        findings
            .iter()
            .fold((0usize, 0usize), |mut acc, finding| {
                match finding.severity {
                    SeverityLevel::Error => acc.0 += 1,
                    SeverityLevel::Warning => acc.1 += 1,
                    SeverityLevel::Ignore => {}
                }
                acc
            });

    let report = LintReport {
        findings,
        operators_checked: catalog.len(),
        error_count,
        warning_count,
    };
    let rendered = render_lint(&report, options.format)?;
    let exit_code = if report.error_count > 0 { 1 } else { 0 };

    Ok(LintOutcome {
        report,
        rendered,
        exit_code,
    })
}

fn build_active_rules(config: &Config) -> Vec<ActiveRule> {
    config
        .lint
        .rules
        .iter()
        .filter_map(|rule| {
            let severity = config.lint.severity_for(*rule);
            if severity == SeverityLevel::Ignore {
                return None;
            }

            let executor = match rule {
                LintRule::DanglingRelated => evaluate_dangling_related as RuleExecutor,
                LintRule::UnresolvedMenuEntry => evaluate_unresolved_menu as RuleExecutor,
                LintRule::EmptyExamples => evaluate_empty_examples as RuleExecutor,
            };

            Some(ActiveRule {
                rule: *rule,
                severity,
                executor,
            })
        })
        .collect()
}

fn evaluate_dangling_related(catalog: &Catalog) -> Vec<RuleFinding> {
    let mut findings = Vec::new();
    for (identifier, record) in catalog.iter() {
        for related in &record.related {
            if catalog.contains(related) {
                continue;
            }
            let message = match catalog.suggest(related) {
                Some(suggestion) => format!(
                    "related operator '{related}' is not documented (did you mean '{suggestion}'?)"
                ),
                None => format!("related operator '{related}' is not documented"),
            };
            findings.push(RuleFinding {
                operator: identifier.to_string(),
                message,
            });
        }
    }
    findings
}

fn evaluate_unresolved_menu(catalog: &Catalog) -> Vec<RuleFinding> {
    catalog
        .menu()
        .iter()
        .flat_map(|group| {
            group
                .operators
                .iter()
                .filter(|identifier| !catalog.contains(identifier))
                .map(move |identifier| RuleFinding {
                    operator: identifier.clone(),
                    message: format!("menu group '{}' links to an undocumented operator", group.title),
                })
        })
        .collect()
}

fn evaluate_empty_examples(catalog: &Catalog) -> Vec<RuleFinding> {
    catalog
        .iter()
        .filter(|(_, record)| record.examples.is_empty())
        .map(|(identifier, _)| RuleFinding {
            operator: identifier.to_string(),
            message: "operator has no examples".to_string(),
        })
        .collect()
}
