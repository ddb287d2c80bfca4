//! Settings types for a drift check.
//!
//! This module defines the structs that map to `driftcheck.yaml`. Every
//! field has a default, so an empty or missing file is a valid
//! configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io::IsTerminal;
use std::str::FromStr;

use crate::live::DEFAULT_TIMEOUT_SECS;
use crate::resource::KindInfo;

/// Settings for one drift check run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DiffSettings {
    /// How live objects are compared with declared ones.
    pub strategy: DiffStrategy,
    /// Redact values and hide context for sensitive kinds.
    pub omit_secrets: bool,
    /// Print nothing for resources without differences.
    pub omit_same: bool,
    /// When to emit ANSI colors.
    pub color: ColorMode,
    /// Namespace for namespaced resources that do not declare one.
    pub default_namespace: String,
    /// Kinds whose bodies are redacted when `omit_secrets` is set.
    pub sensitive_kinds: Vec<String>,
    /// Number of comparisons in flight at once.
    pub concurrency: usize,
    /// Live API server settings.
    pub server: ServerConfig,
    /// Naming overrides for kinds the built-in table does not know.
    pub kinds: HashMap<String, KindInfo>,
}

/// Live API server settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Base URL of the API server.
    pub url: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Comparison strategy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DiffStrategy {
    /// Compare complete documents.
    #[default]
    #[serde(rename = "all", alias = "full")]
    #[value(name = "all", alias = "full")]
    Full,
    /// Mask live fields the declaration does not mention before comparing.
    #[serde(rename = "subset")]
    #[value(name = "subset")]
    Subset,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color when stdout is a terminal.
    #[default]
    Auto,
    /// Always color.
    Always,
    /// Never color.
    Never,
}

impl Default for DiffSettings {
    fn default() -> Self {
        Self {
            strategy: DiffStrategy::default(),
            omit_secrets: false,
            omit_same: false,
            color: ColorMode::default(),
            default_namespace: String::from("default"),
            sensitive_kinds: vec![String::from("Secret")],
            concurrency: 1,
            server: ServerConfig::default(),
            kinds: HashMap::new(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl DiffSettings {
    /// Returns whether `kind` is one of the sensitive kinds.
    #[must_use]
    pub fn is_sensitive(&self, kind: &str) -> bool {
        self.sensitive_kinds.iter().any(|k| k == kind)
    }
}

impl ColorMode {
    /// Resolves the mode to a yes/no answer for stdout.
    #[must_use]
    pub fn enabled(self) -> bool {
        match self {
            Self::Auto => std::io::stdout().is_terminal(),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

impl FromStr for DiffStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" | "full" => Ok(Self::Full),
            "subset" => Ok(Self::Subset),
            other => Err(format!("unknown diff strategy '{other}' (expected all or subset)")),
        }
    }
}

impl fmt::Display for DiffStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Full => "all",
            Self::Subset => "subset",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = DiffSettings::default();
        assert_eq!(settings.strategy, DiffStrategy::Full);
        assert_eq!(settings.default_namespace, "default");
        assert_eq!(settings.concurrency, 1);
        assert!(settings.is_sensitive("Secret"));
        assert!(!settings.is_sensitive("ConfigMap"));
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!("all".parse::<DiffStrategy>(), Ok(DiffStrategy::Full));
        assert_eq!("Full".parse::<DiffStrategy>(), Ok(DiffStrategy::Full));
        assert_eq!("subset".parse::<DiffStrategy>(), Ok(DiffStrategy::Subset));
        assert!("partial".parse::<DiffStrategy>().is_err());
        assert_eq!(DiffStrategy::Subset.to_string(), "subset");
    }

    #[test]
    fn test_color_mode_fixed_answers() {
        assert!(ColorMode::Always.enabled());
        assert!(!ColorMode::Never.enabled());
    }
}
