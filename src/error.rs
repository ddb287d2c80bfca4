//! Error types for the drift detector.
//!
//! Errors fall into two groups. [`DriftError`] and its children abort a run:
//! bad settings, unreadable manifests, a broken output sink, or a violated
//! masking contract. [`ResourceError`] is local to a single resource and is
//! reported inline while the run carries on.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the drift detector.
#[derive(Debug, Error)]
pub enum DriftError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Live store errors raised outside of a per-resource comparison.
    #[error("Live store error: {0}")]
    Store(#[from] StoreError),

    /// Diff contract violations.
    #[error("Diff error: {0}")]
    Diff(#[from] DiffError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Configuration and manifest errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A settings file or manifest path was not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// A settings file or manifest could not be parsed.
    #[error("Failed to parse {}: {message}", .location.as_deref().unwrap_or("input"))]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// Validation failed.
    #[error("Settings validation failed: {message}")]
    ValidationError {
        /// Description of the validation error.
        message: String,
        /// Field that failed validation.
        field: Option<String>,
    },

    /// Environment variable holds an unusable value.
    #[error("Invalid value for environment variable {name}: {value}")]
    InvalidEnvVar {
        /// Name of the variable.
        name: String,
        /// The rejected value.
        value: String,
    },

    /// No live source was configured for a diff run.
    #[error("No live source configured: pass --server, --live-from or set server.url")]
    NoLiveSource,
}

/// Errors returned by a live store while fetching one object.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store rejected our credentials.
    #[error("unauthorized: {message}")]
    Unauthorized {
        /// Description of the auth failure.
        message: String,
    },

    /// The store answered with a non-success status other than 404.
    #[error("request failed with status {status}: {message}")]
    ApiRequestFailed {
        /// HTTP status code.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    /// The store could not be reached.
    #[error("network error: {message}")]
    NetworkError {
        /// Description of the network error.
        message: String,
    },

    /// The store answered with something that is not an object.
    #[error("invalid response: {message}")]
    InvalidResponse {
        /// Description of the response issue.
        message: String,
    },
}

/// Fatal violations of the diff contract.
#[derive(Debug, Error)]
pub enum DiffError {
    /// A leaf value fell outside the JSON-like value set the masker understands.
    #[error("Found unexpected value {value} while masking live fields")]
    UnrecognizedValue {
        /// Textual form of the offending value.
        value: String,
    },

    /// A value could not be rendered to its canonical text form.
    #[error("Failed to canonicalize {label}: {message}")]
    Canonicalize {
        /// Label of the resource being canonicalized.
        label: String,
        /// Serializer message.
        message: String,
    },
}

/// Errors confined to one resource; the run reports them and continues.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The declared resource has no name, so nothing can be fetched.
    #[error("Error fetching one of the {resource}: it does not have a name set")]
    MissingName {
        /// REST resource name of the kind.
        resource: String,
    },

    /// The live store failed with something other than "not found".
    #[error("Error fetching {label}: {source}")]
    Fetch {
        /// Label of the resource.
        label: String,
        /// Underlying store failure.
        #[source]
        source: StoreError,
    },
}

/// Result type alias for driftcheck operations.
pub type Result<T> = std::result::Result<T, DriftError>;

impl DriftError {
    /// Creates a new internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl ConfigError {
    /// Creates a validation error for a specific field.
    #[must_use]
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Creates a parse error tied to a source location.
    #[must_use]
    pub fn parse(message: impl Into<String>, location: Option<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            location,
        }
    }
}

impl StoreError {
    /// Creates an API request error.
    #[must_use]
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiRequestFailed {
            status,
            message: message.into(),
        }
    }

    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError {
            message: message.into(),
        }
    }
}
