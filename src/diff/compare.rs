//! Per-resource comparison.
//!
//! A [`Comparator`] fetches the live counterpart of one declared resource,
//! optionally masks it, diffs the canonical texts and classifies the result.

use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::config::{DiffSettings, DiffStrategy};
use crate::error::{DiffError, ResourceError};
use crate::live::LiveStore;
use crate::resource::{KindNamer, Resource};

use super::canonical::canonical_text;
use super::lines::{SegmentKind, diff_lines};
use super::mask::mask_fields;
use super::render::{render_segments, trim_final_newline};

/// Classification of one comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Live and declared documents match.
    Unchanged,
    /// The comparison could not be completed.
    Error,
    /// There is no live counterpart.
    OnlyDeclared,
    /// Live and declared documents differ.
    Changed,
}

/// What a comparison found, with the data each classification carries.
#[derive(Debug)]
pub enum Outcome {
    /// Live and declared documents match.
    Unchanged,
    /// The comparison could not be completed.
    Error(ResourceError),
    /// There is no live counterpart.
    OnlyDeclared,
    /// Live and declared documents differ; holds the rendered diff.
    Changed(String),
}

/// Result of comparing one declared resource with its live counterpart.
#[derive(Debug)]
pub struct ComparisonResult {
    /// Human-readable label: resource name of the kind plus qualified name.
    pub label: String,
    /// What the comparison found.
    pub outcome: Outcome,
}

/// Options that shape a comparison.
#[derive(Debug, Clone)]
pub struct CompareOptions {
    /// Comparison strategy.
    pub strategy: DiffStrategy,
    /// Redact sensitive kinds.
    pub omit_secrets: bool,
    /// Kinds treated as sensitive.
    pub sensitive_kinds: Vec<String>,
    /// Emit ANSI colors in rendered diffs.
    pub color: bool,
    /// Namespace applied to namespaced resources without one.
    pub default_namespace: String,
}

/// Compares declared resources against a live store.
#[derive(Debug)]
pub struct Comparator<'a, S: LiveStore + ?Sized> {
    /// Live store.
    store: &'a S,
    /// Kind to resource name mapping.
    namer: &'a KindNamer,
    /// Comparison options.
    options: &'a CompareOptions,
}

impl ComparisonResult {
    /// Creates a result.
    #[must_use]
    pub const fn new(label: String, outcome: Outcome) -> Self {
        Self { label, outcome }
    }

    /// Creates an error result.
    #[must_use]
    pub const fn error(label: String, error: ResourceError) -> Self {
        Self::new(label, Outcome::Error(error))
    }

    /// Returns the classification.
    #[must_use]
    pub const fn classification(&self) -> Classification {
        match self.outcome {
            Outcome::Unchanged => Classification::Unchanged,
            Outcome::Error(_) => Classification::Error,
            Outcome::OnlyDeclared => Classification::OnlyDeclared,
            Outcome::Changed(_) => Classification::Changed,
        }
    }

    /// Returns the rendered diff of a changed resource.
    #[must_use]
    pub fn details(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Changed(details) => Some(details),
            _ => None,
        }
    }

    /// Returns the error of a failed comparison.
    #[must_use]
    pub const fn error_value(&self) -> Option<&ResourceError> {
        match &self.outcome {
            Outcome::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Returns true for classifications that count as differences.
    #[must_use]
    pub const fn is_difference(&self) -> bool {
        matches!(self.outcome, Outcome::OnlyDeclared | Outcome::Changed(_))
    }
}

impl CompareOptions {
    /// Derives comparison options from settings and a resolved color flag.
    #[must_use]
    pub fn from_settings(settings: &DiffSettings, color: bool) -> Self {
        Self {
            strategy: settings.strategy,
            omit_secrets: settings.omit_secrets,
            sensitive_kinds: settings.sensitive_kinds.clone(),
            color,
            default_namespace: settings.default_namespace.clone(),
        }
    }

    fn redacts(&self, kind: &str) -> bool {
        self.omit_secrets && self.sensitive_kinds.iter().any(|k| k == kind)
    }
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self::from_settings(&DiffSettings::default(), false)
    }
}

impl<'a, S: LiveStore + ?Sized> Comparator<'a, S> {
    /// Creates a comparator.
    #[must_use]
    pub const fn new(store: &'a S, namer: &'a KindNamer, options: &'a CompareOptions) -> Self {
        Self {
            store,
            namer,
            options,
        }
    }

    /// Returns the backend type of the live store.
    #[must_use]
    pub fn backend_type(&self) -> &'static str {
        self.store.backend_type()
    }

    /// Compares one declared resource with its live counterpart.
    ///
    /// Store failures and unnamed resources become [`Outcome::Error`].
    ///
    /// # Errors
    ///
    /// Returns a [`DiffError`] when masking meets a value it does not
    /// understand or a document cannot be canonicalized. Either one means
    /// the whole run must stop.
    pub async fn compare(&self, resource: &Resource) -> Result<ComparisonResult, DiffError> {
        let resource_name = self.namer.resource_name(resource.kind());
        let label = format!("{resource_name} {}", resource.fq_name());

        if resource.name().is_empty() {
            return Ok(ComparisonResult::error(
                label,
                ResourceError::MissingName {
                    resource: resource_name,
                },
            ));
        }

        debug!("Fetching {label}");
        let id = resource.id(self.namer, &self.options.default_namespace);
        let live = match self.store.get(&id).await {
            Ok(Some(live)) => live,
            Ok(None) => {
                debug!("{label} doesn't exist on the server");
                return Ok(ComparisonResult::new(label, Outcome::OnlyDeclared));
            }
            Err(source) => {
                let error = ResourceError::Fetch {
                    label: label.clone(),
                    source,
                };
                return Ok(ComparisonResult::error(label, error));
            }
        };

        let live = match self.options.strategy {
            DiffStrategy::Subset => mask_fields(resource.object(), &live)?,
            DiffStrategy::Full => live,
        };

        let live_text = canonical(&label, &live)?;
        let declared_text = canonical(&label, resource.object())?;

        let segments = diff_lines(&live_text, &declared_text);
        if let [only] = segments.as_slice()
            && only.kind == SegmentKind::Equal
        {
            debug!("{label} is up to date");
            return Ok(ComparisonResult::new(label, Outcome::Unchanged));
        }

        let redact = self.options.redacts(resource.kind());
        let details = trim_final_newline(render_segments(&segments, self.options.color, redact));
        debug!("{label} differs ({} segments)", segments.len());
        Ok(ComparisonResult::new(label, Outcome::Changed(details)))
    }
}

fn canonical(label: &str, value: &serde_json::Value) -> Result<String, DiffError> {
    canonical_text(value).map_err(|e| DiffError::Canonicalize {
        label: label.to_string(),
        message: e.to_string(),
    })
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unchanged => "unchanged",
            Self::Error => "error",
            Self::OnlyDeclared => "only declared",
            Self::Changed => "changed",
        };
        write!(f, "{s}")
    }
}
