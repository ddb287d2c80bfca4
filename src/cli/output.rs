//! Output formatting for CLI commands.
//!
//! This module provides formatting utilities for displaying
//! information to the user in various formats.

use colored::Colorize;
use std::collections::BTreeMap;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::config::{DiffSettings, ValidationResult};
use crate::diff::{Classification, ComparisonResult};
use crate::resource::{KindNamer, Resource};
use crate::runner::{DiffReport, RunOutcome};

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Classification row for the summary table.
#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Result")]
    classification: String,
    #[tabled(rename = "Resources")]
    count: usize,
}

/// Kind row for the validation table.
#[derive(Tabled)]
struct KindRow {
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Resource")]
    resource: String,
    #[tabled(rename = "Count")]
    count: usize,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Returns true when the report is written as JSON instead of streamed.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Formats a finished report. Text output only carries the final
    /// status line because the diff itself is streamed while running.
    #[must_use]
    pub fn format_report(&self, report: &DiffReport) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(&ReportJson::from(report)).unwrap_or_default()
            }
            OutputFormat::Text => Self::format_outcome(report),
        }
    }

    /// Formats a table of classification counts.
    #[must_use]
    pub fn format_summary(report: &DiffReport) -> String {
        let rows: Vec<SummaryRow> = [
            Classification::Unchanged,
            Classification::Changed,
            Classification::OnlyDeclared,
            Classification::Error,
        ]
        .into_iter()
        .map(|classification| SummaryRow {
            classification: Self::format_classification(classification),
            count: report.count(classification),
        })
        .collect();

        let mut output = Table::new(rows).to_string();
        output.push('\n');
        output.push_str(&Self::format_outcome(report));
        output
    }

    /// Formats the result of a `validate` run.
    #[must_use]
    pub fn format_validation(
        &self,
        settings: &DiffSettings,
        resources: &[Resource],
        result: &ValidationResult,
    ) -> String {
        let namer = KindNamer::with_overrides(settings.kinds.clone());
        let mut kinds: BTreeMap<&str, usize> = BTreeMap::new();
        for resource in resources {
            *kinds.entry(resource.kind()).or_default() += 1;
        }
        let unnamed = resources.iter().filter(|r| r.name().is_empty()).count();

        match self.format {
            OutputFormat::Json => {
                let json = ValidationJson {
                    valid: result.is_valid(),
                    strategy: settings.strategy.to_string(),
                    default_namespace: settings.default_namespace.clone(),
                    resources: resources.len(),
                    unnamed,
                    kinds: kinds
                        .iter()
                        .map(|(kind, count)| ((*kind).to_string(), *count))
                        .collect(),
                    warnings: result.warnings.clone(),
                };
                serde_json::to_string_pretty(&json).unwrap_or_default()
            }
            OutputFormat::Text => {
                let mut output = format!("{} Settings are valid.\n\n", "✓".green());
                let _ = writeln!(output, "   Strategy: {}", settings.strategy);
                let _ = writeln!(output, "   Default namespace: {}", settings.default_namespace);
                let _ = writeln!(output, "   Resources: {}\n", resources.len());

                if !kinds.is_empty() {
                    let rows: Vec<KindRow> = kinds
                        .iter()
                        .map(|(kind, count)| KindRow {
                            kind: (*kind).to_string(),
                            resource: namer.resource_name(kind),
                            count: *count,
                        })
                        .collect();
                    output.push_str(&Table::new(rows).to_string());
                    output.push('\n');
                }

                if unnamed > 0 {
                    let _ = write!(
                        output,
                        "\n{} {unnamed} resources have no name and will be reported as errors.\n",
                        "⚠".yellow()
                    );
                }

                if !result.warnings.is_empty() {
                    let _ = write!(output, "\n{} Warnings:\n", "⚠".yellow());
                    for warning in &result.warnings {
                        let _ = writeln!(output, "   - {warning}");
                    }
                }

                output
            }
        }
    }

    /// Formats the final status line of a run.
    fn format_outcome(report: &DiffReport) -> String {
        match report.outcome() {
            RunOutcome::Clean => format!(
                "{} No differences found ({}).\n",
                "✓".green(),
                report.summary_line()
            ),
            RunOutcome::DifferencesFound => format!(
                "{} Differences found ({}).\n",
                "⚠".yellow(),
                report.summary_line()
            ),
        }
    }

    /// Formats a classification with color.
    fn format_classification(classification: Classification) -> String {
        let text = classification.to_string();
        match classification {
            Classification::Unchanged => text.green().to_string(),
            Classification::Changed => text.yellow().to_string(),
            Classification::OnlyDeclared => text.cyan().to_string(),
            Classification::Error => text.red().to_string(),
        }
    }
}

// JSON serialization helpers

#[derive(serde::Serialize)]
struct ReportJson<'a> {
    outcome: RunOutcome,
    differences_found: bool,
    results: Vec<ResultJson<'a>>,
}

#[derive(serde::Serialize)]
struct ResultJson<'a> {
    label: &'a str,
    classification: Classification,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(serde::Serialize)]
struct ValidationJson {
    valid: bool,
    strategy: String,
    default_namespace: String,
    resources: usize,
    unnamed: usize,
    kinds: BTreeMap<String, usize>,
    warnings: Vec<String>,
}

impl<'a> From<&'a DiffReport> for ReportJson<'a> {
    fn from(report: &'a DiffReport) -> Self {
        Self {
            outcome: report.outcome(),
            differences_found: report.differences_found,
            results: report.results.iter().map(ResultJson::from).collect(),
        }
    }
}

impl<'a> From<&'a ComparisonResult> for ResultJson<'a> {
    fn from(result: &'a ComparisonResult) -> Self {
        Self {
            label: &result.label,
            classification: result.classification(),
            details: result.details(),
            error: result.error_value().map(ToString::to_string),
        }
    }
}
