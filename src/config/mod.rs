//! Configuration module for the drift detector.
//!
//! This module handles all configuration-related functionality:
//! - Deserializing `driftcheck.yaml` and applying environment overrides
//! - Validation of settings values
//! - Loading declared and exported manifests

mod manifest;
mod parser;
mod settings;
mod validator;

pub use manifest::{ManifestLoader, STDIN_PATH};
pub use parser::{
    DEFAULT_SETTINGS_FILES, SettingsParser, TOKEN_ENV, apply_env_overrides, find_settings_file,
};
pub use settings::{ColorMode, DiffSettings, DiffStrategy, ServerConfig};
pub use validator::{MAX_CONCURRENCY, SettingsValidator, ValidationError, ValidationResult};
