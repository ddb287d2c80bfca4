//! Drift check runner.
//!
//! This module drives a [`Comparator`] over every declared resource in a
//! deterministic order, streams the report to a writer and aggregates the
//! differences-found signal.

use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::io::Write;
use tracing::{debug, info};

use crate::diff::{Classification, CompareOptions, Comparator, ComparisonResult, Outcome};
use crate::error::Result;
use crate::live::LiveStore;
use crate::resource::{KindNamer, Resource, sort_resources};

/// Exit code for a run that found differences.
pub const DIFFERENCES_EXIT_CODE: u8 = 10;

/// Runs a drift check over a set of declared resources.
pub struct DiffRunner<'a, S: LiveStore + ?Sized> {
    /// Per-resource comparator.
    comparator: Comparator<'a, S>,
    /// Skip headers of unchanged resources.
    omit_same: bool,
    /// Number of comparisons in flight.
    concurrency: usize,
}

/// Outcome of a completed run. Failures are reported as errors instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every resource matched or failed without a difference.
    Clean,
    /// At least one resource is missing or changed.
    DifferencesFound,
}

/// Results of a run, in output order.
#[derive(Debug)]
pub struct DiffReport {
    /// One result per declared resource, sorted.
    pub results: Vec<ComparisonResult>,
    /// Whether any resource is missing or changed.
    pub differences_found: bool,
}

impl<'a, S: LiveStore + ?Sized> DiffRunner<'a, S> {
    /// Creates a sequential runner.
    #[must_use]
    pub const fn new(store: &'a S, namer: &'a KindNamer, options: &'a CompareOptions) -> Self {
        Self {
            comparator: Comparator::new(store, namer, options),
            omit_same: false,
            concurrency: 1,
        }
    }

    /// Leaves unchanged resources out of the report.
    #[must_use]
    pub const fn with_omit_same(mut self, omit_same: bool) -> Self {
        self.omit_same = omit_same;
        self
    }

    /// Sets how many comparisons may run at once. Output order does not
    /// depend on it.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Compares every resource and writes the report to `out`.
    ///
    /// Per-resource failures are written inline and do not stop the run.
    ///
    /// # Errors
    ///
    /// Returns an error if a diff contract is violated or `out` fails.
    pub async fn run<W: Write>(&self, mut resources: Vec<Resource>, out: &mut W) -> Result<DiffReport> {
        let backend = self.comparator.backend_type();
        info!("Checking {} resources against the {backend} store", resources.len());
        sort_resources(&mut resources);

        let mut comparisons = stream::iter(resources.iter().map(|r| self.comparator.compare(r)))
            .buffered(self.concurrency);

        let mut results = Vec::with_capacity(resources.len());
        let mut differences_found = false;

        while let Some(result) = comparisons.next().await {
            let result = result?;
            debug!("{}: {}", result.label, result.classification());

            differences_found |= result.is_difference();
            self.write_result(&result, out)?;
            results.push(result);
        }
        out.flush()?;

        let report = DiffReport {
            results,
            differences_found,
        };
        info!("Drift check finished: {}", report.summary_line());
        Ok(report)
    }

    fn write_result<W: Write>(&self, result: &ComparisonResult, out: &mut W) -> std::io::Result<()> {
        if self.omit_same && matches!(result.outcome, Outcome::Unchanged) {
            return Ok(());
        }

        writeln!(out, "---")?;
        writeln!(out, "- live {label}\n+ config {label}", label = result.label)?;

        match &result.outcome {
            Outcome::Unchanged => Ok(()),
            Outcome::Error(err) => writeln!(out, "{err}"),
            Outcome::OnlyDeclared => writeln!(out, "{} doesn't exist on server", result.label),
            Outcome::Changed(details) => writeln!(out, "{details}"),
        }
    }
}

impl RunOutcome {
    /// Returns the process exit code for this outcome.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::Clean => 0,
            Self::DifferencesFound => DIFFERENCES_EXIT_CODE,
        }
    }
}

impl DiffReport {
    /// Returns the run outcome.
    #[must_use]
    pub const fn outcome(&self) -> RunOutcome {
        if self.differences_found {
            RunOutcome::DifferencesFound
        } else {
            RunOutcome::Clean
        }
    }

    /// Counts results with the given classification.
    #[must_use]
    pub fn count(&self, classification: Classification) -> usize {
        self.results
            .iter()
            .filter(|r| r.classification() == classification)
            .count()
    }

    /// Returns a one-line tally of the classifications.
    #[must_use]
    pub fn summary_line(&self) -> String {
        format!(
            "{} unchanged, {} changed, {} only declared, {} errors",
            self.count(Classification::Unchanged),
            self.count(Classification::Changed),
            self.count(Classification::OnlyDeclared),
            self.count(Classification::Error),
        )
    }
}
