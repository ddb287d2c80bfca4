//! Settings parser for loading and merging configuration.
//!
//! Settings come from an optional YAML file and the environment, with the
//! environment taking precedence. Command-line flags are applied on top by
//! the binary.

use crate::error::{ConfigError, DriftError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::settings::DiffSettings;

/// Environment variable holding the API bearer token.
pub const TOKEN_ENV: &str = "DRIFTCHECK_TOKEN";

/// Default settings file names to search for.
pub const DEFAULT_SETTINGS_FILES: &[&str] = &[
    "driftcheck.yaml",
    "driftcheck.yml",
    ".driftcheck.yaml",
];

/// Settings parser.
#[derive(Debug, Default)]
pub struct SettingsParser {
    /// Base path for resolving the `.env` file.
    base_path: Option<PathBuf>,
}

impl SettingsParser {
    /// Creates a new settings parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the base path for resolving the `.env` file.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Loads settings from `explicit` if given, otherwise from the first
    /// discovered settings file, otherwise the defaults. Environment
    /// overrides are applied in every case.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing, a file cannot be
    /// parsed, or an override holds an invalid value.
    pub fn load(&self, explicit: Option<&Path>) -> Result<DiffSettings> {
        let discovered = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => std::env::current_dir().ok().and_then(find_settings_file),
        };

        let mut settings = match discovered {
            Some(path) => self.load_file(&path)?,
            None => {
                debug!("No settings file found, using defaults");
                DiffSettings::default()
            }
        };

        apply_env_overrides(&mut settings, |name| std::env::var(name).ok())?;
        Ok(settings)
    }

    /// Loads settings from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<DiffSettings> {
        let path = path.as_ref();
        info!("Loading settings from: {}", path.display());

        if !path.exists() {
            return Err(DriftError::Config(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::parse(
                format!("Failed to read file: {e}"),
                Some(path.display().to_string()),
            )
        })?;

        self.parse_yaml(&content, Some(path))
    }

    /// Parses settings from a YAML string. An empty document yields the
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn parse_yaml(&self, content: &str, source: Option<&Path>) -> Result<DiffSettings> {
        debug!("Parsing YAML settings");

        if content.trim().is_empty() {
            return Ok(DiffSettings::default());
        }

        let settings: DiffSettings = serde_yaml::from_str(content).map_err(|e| {
            ConfigError::parse(
                format!("YAML parse error: {e}"),
                source.map(|p| p.display().to_string()),
            )
        })?;

        Ok(settings)
    }

    /// Loads the .env file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self
            .base_path
            .as_ref()
            .map_or_else(|| PathBuf::from(".env"), |p| p.join(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| {
                ConfigError::parse(
                    format!("Failed to load .env file: {e}"),
                    Some(env_path.display().to_string()),
                )
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }

    /// Gets the API bearer token from the environment, if set.
    #[must_use]
    pub fn get_token() -> Option<String> {
        std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty())
    }
}

/// Applies `DRIFTCHECK_*` overrides read through `lookup`.
///
/// # Errors
///
/// Returns an error if an override cannot be parsed.
pub fn apply_env_overrides(
    settings: &mut DiffSettings,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(namespace) = lookup("DRIFTCHECK_NAMESPACE") {
        debug!("Overriding default_namespace from environment");
        settings.default_namespace = namespace;
    }

    if let Some(url) = lookup("DRIFTCHECK_SERVER") {
        debug!("Overriding server.url from environment");
        settings.server.url = Some(url);
    }

    if let Some(strategy) = lookup("DRIFTCHECK_STRATEGY") {
        debug!("Overriding strategy from environment");
        settings.strategy = strategy.parse().map_err(|_| ConfigError::InvalidEnvVar {
            name: String::from("DRIFTCHECK_STRATEGY"),
            value: strategy.clone(),
        })?;
    }

    if let Some(concurrency) = lookup("DRIFTCHECK_CONCURRENCY") {
        debug!("Overriding concurrency from environment");
        settings.concurrency = concurrency.parse().map_err(|_| ConfigError::InvalidEnvVar {
            name: String::from("DRIFTCHECK_CONCURRENCY"),
            value: concurrency.clone(),
        })?;
    }

    Ok(())
}

/// Finds a settings file in `start_dir` or its parents, falling back to the
/// user configuration directory.
#[must_use]
pub fn find_settings_file(start_dir: impl AsRef<Path>) -> Option<PathBuf> {
    let mut current = start_dir.as_ref().to_path_buf();

    loop {
        for filename in DEFAULT_SETTINGS_FILES {
            let candidate = current.join(filename);
            if candidate.exists() {
                info!("Found settings file: {}", candidate.display());
                return Some(candidate);
            }
        }

        if !current.pop() {
            break;
        }
    }

    dirs::config_dir()
        .map(|dir| dir.join("driftcheck").join(DEFAULT_SETTINGS_FILES[0]))
        .filter(|path| path.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::{ColorMode, DiffStrategy};
    use std::collections::HashMap;

    #[test]
    fn test_parse_empty_settings() {
        let parser = SettingsParser::new();
        let settings = parser.parse_yaml("\n", None).expect("empty is valid");
        assert_eq!(settings, DiffSettings::default());
    }

    #[test]
    fn test_parse_full_settings() {
        let yaml = r"
strategy: subset
omit_secrets: true
omit_same: true
color: never
default_namespace: payments
sensitive_kinds: [Secret, SealedSecret]
concurrency: 8
server:
  url: https://cluster.internal:6443
  timeout_secs: 5
kinds:
  Widget:
    plural: widgets
    namespaced: false
";
        let settings = SettingsParser::new()
            .parse_yaml(yaml, None)
            .expect("valid settings");

        assert_eq!(settings.strategy, DiffStrategy::Subset);
        assert!(settings.omit_secrets);
        assert!(settings.omit_same);
        assert_eq!(settings.color, ColorMode::Never);
        assert_eq!(settings.default_namespace, "payments");
        assert!(settings.is_sensitive("SealedSecret"));
        assert_eq!(settings.concurrency, 8);
        assert_eq!(settings.server.url.as_deref(), Some("https://cluster.internal:6443"));
        assert_eq!(settings.server.timeout_secs, 5);
        assert!(!settings.kinds["Widget"].namespaced);
    }

    #[test]
    fn test_strategy_alias() {
        let settings = SettingsParser::new()
            .parse_yaml("strategy: full\n", None)
            .expect("alias accepted");
        assert_eq!(settings.strategy, DiffStrategy::Full);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let result = SettingsParser::new().parse_yaml("omit_secret: true\n", None);
        assert!(result.is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("DRIFTCHECK_NAMESPACE", "ops"),
            ("DRIFTCHECK_SERVER", "http://localhost:8001"),
            ("DRIFTCHECK_STRATEGY", "subset"),
            ("DRIFTCHECK_CONCURRENCY", "4"),
        ]
        .into_iter()
        .collect();

        let mut settings = DiffSettings::default();
        apply_env_overrides(&mut settings, |name| env.get(name).map(|v| (*v).to_string()))
            .expect("overrides are valid");

        assert_eq!(settings.default_namespace, "ops");
        assert_eq!(settings.server.url.as_deref(), Some("http://localhost:8001"));
        assert_eq!(settings.strategy, DiffStrategy::Subset);
        assert_eq!(settings.concurrency, 4);
    }

    #[test]
    fn test_invalid_env_override() {
        let mut settings = DiffSettings::default();
        let result = apply_env_overrides(&mut settings, |name| {
            (name == "DRIFTCHECK_CONCURRENCY").then(|| String::from("many"))
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_load_file_from_disk() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("driftcheck.yaml");
        std::fs::write(&path, "omit_same: true\n").expect("write settings");

        let settings = SettingsParser::new().load_file(&path).expect("loads");
        assert!(settings.omit_same);

        let missing = SettingsParser::new().load_file(dir.path().join("nope.yaml"));
        assert!(matches!(
            missing,
            Err(DriftError::Config(ConfigError::FileNotFound { .. }))
        ));
    }

    #[test]
    fn test_settings_discovered_in_parent() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let nested = dir.path().join("apps").join("web");
        std::fs::create_dir_all(&nested).expect("create dirs");
        std::fs::write(dir.path().join(".driftcheck.yaml"), "omit_same: true\n")
            .expect("write settings");

        let found = find_settings_file(&nested).expect("settings in a parent");
        assert_eq!(found, dir.path().join(".driftcheck.yaml"));
    }
}
