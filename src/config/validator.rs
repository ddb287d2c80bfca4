//! Settings validation.
//!
//! This module checks a [`DiffSettings`] value before a run so that bad
//! namespaces, URLs or limits fail early instead of per resource.

use crate::error::{ConfigError, Result};
use tracing::debug;

use super::settings::DiffSettings;

/// Highest accepted number of concurrent comparisons.
pub const MAX_CONCURRENCY: usize = 64;

/// Validator for drift check settings.
#[derive(Debug, Default)]
pub struct SettingsValidator;

/// Validation result containing all problems found.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of warnings (non-fatal issues).
    pub warnings: Vec<String>,
}

/// A single validation error.
#[derive(Debug)]
pub struct ValidationError {
    /// The field path that failed validation.
    pub field: String,
    /// The error message.
    pub message: String,
}

impl SettingsValidator {
    /// Creates a new validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates settings.
    ///
    /// # Errors
    ///
    /// Returns the first validation error if any check fails.
    pub fn validate(&self, settings: &DiffSettings) -> Result<ValidationResult> {
        let mut result = ValidationResult::default();

        Self::validate_namespace(&settings.default_namespace, &mut result);
        Self::validate_concurrency(settings.concurrency, &mut result);
        Self::validate_server(settings, &mut result);
        Self::validate_kinds(settings, &mut result);

        if settings.omit_secrets && settings.sensitive_kinds.is_empty() {
            result.warnings.push(String::from(
                "omit_secrets is set but sensitive_kinds is empty, nothing will be redacted",
            ));
        }

        if result.errors.is_empty() {
            debug!("Settings validation passed");
            Ok(result)
        } else {
            let first_error = &result.errors[0];
            Err(ConfigError::validation(first_error.message.clone(), first_error.field.clone()).into())
        }
    }

    fn validate_namespace(namespace: &str, result: &mut ValidationResult) {
        if namespace.is_empty() {
            result.errors.push(ValidationError {
                field: String::from("default_namespace"),
                message: String::from("Default namespace cannot be empty"),
            });
        } else if !is_dns_label(namespace) {
            result.errors.push(ValidationError {
                field: String::from("default_namespace"),
                message: format!(
                    "Namespace '{namespace}' is invalid. Must be at most 63 lowercase alphanumeric characters or hyphens."
                ),
            });
        }
    }

    fn validate_concurrency(concurrency: usize, result: &mut ValidationResult) {
        if concurrency == 0 || concurrency > MAX_CONCURRENCY {
            result.errors.push(ValidationError {
                field: String::from("concurrency"),
                message: format!("Concurrency must be between 1 and {MAX_CONCURRENCY}, got {concurrency}"),
            });
        }
    }

    fn validate_server(settings: &DiffSettings, result: &mut ValidationResult) {
        if let Some(url) = &settings.server.url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            result.errors.push(ValidationError {
                field: String::from("server.url"),
                message: format!("Server URL '{url}' must start with http:// or https://"),
            });
        }

        if settings.server.timeout_secs == 0 {
            result.errors.push(ValidationError {
                field: String::from("server.timeout_secs"),
                message: String::from("Server timeout must be at least one second"),
            });
        }
    }

    fn validate_kinds(settings: &DiffSettings, result: &mut ValidationResult) {
        for kind in &settings.sensitive_kinds {
            if kind.is_empty() {
                result.errors.push(ValidationError {
                    field: String::from("sensitive_kinds"),
                    message: String::from("Sensitive kinds cannot contain an empty name"),
                });
            }
        }

        let mut overridden: Vec<_> = settings.kinds.iter().collect();
        overridden.sort_by(|a, b| a.0.cmp(b.0));
        for (kind, info) in overridden {
            if info.plural.is_empty() || info.plural.chars().any(|c| c == '/' || c.is_whitespace()) {
                result.errors.push(ValidationError {
                    field: format!("kinds.{kind}.plural"),
                    message: format!("Resource name '{}' for kind {kind} is invalid", info.plural),
                });
            }
        }
    }
}

impl ValidationResult {
    /// Returns true if no errors were found.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Checks RFC 1123 label syntax.
fn is_dns_label(s: &str) -> bool {
    s.len() <= 63
        && s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !s.starts_with('-')
        && !s.ends_with('-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DriftError;
    use crate::resource::KindInfo;

    fn field_of(result: Result<ValidationResult>) -> Option<String> {
        match result {
            Err(DriftError::Config(ConfigError::ValidationError { field, .. })) => field,
            _ => None,
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        let result = SettingsValidator::new()
            .validate(&DiffSettings::default())
            .expect("defaults are valid");
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_invalid_namespace() {
        let settings = DiffSettings {
            default_namespace: String::from("Team_A"),
            ..DiffSettings::default()
        };
        let field = field_of(SettingsValidator::new().validate(&settings));
        assert_eq!(field.as_deref(), Some("default_namespace"));
    }

    #[test]
    fn test_concurrency_bounds() {
        for concurrency in [0, MAX_CONCURRENCY + 1] {
            let settings = DiffSettings {
                concurrency,
                ..DiffSettings::default()
            };
            let field = field_of(SettingsValidator::new().validate(&settings));
            assert_eq!(field.as_deref(), Some("concurrency"));
        }
    }

    #[test]
    fn test_server_url_scheme() {
        let mut settings = DiffSettings::default();
        settings.server.url = Some(String::from("cluster.internal:6443"));
        let field = field_of(SettingsValidator::new().validate(&settings));
        assert_eq!(field.as_deref(), Some("server.url"));
    }

    #[test]
    fn test_bad_kind_override() {
        let mut settings = DiffSettings::default();
        settings.kinds.insert(
            String::from("Widget"),
            KindInfo {
                plural: String::from("wid gets"),
                namespaced: true,
            },
        );
        let field = field_of(SettingsValidator::new().validate(&settings));
        assert_eq!(field.as_deref(), Some("kinds.Widget.plural"));
    }

    #[test]
    fn test_redaction_without_kinds_warns() {
        let settings = DiffSettings {
            omit_secrets: true,
            sensitive_kinds: vec![],
            ..DiffSettings::default()
        };
        let result = SettingsValidator::new()
            .validate(&settings)
            .expect("only a warning");
        assert_eq!(result.warnings.len(), 1);
    }
}
