//! Manifest loading.
//!
//! Declared resources, and exported live objects, are read from YAML
//! streams (several `---` separated documents per file) or JSON files.
//! Documents of a `*List` kind are flattened into their items.

use serde::Deserialize;
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{ConfigError, DriftError, Result};
use crate::resource::Resource;

/// File extensions picked up when loading a directory.
const MANIFEST_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// Path that stands for standard input.
pub const STDIN_PATH: &str = "-";

/// Loader for manifest files and directories.
#[derive(Debug, Default)]
pub struct ManifestLoader;

impl ManifestLoader {
    /// Creates a new manifest loader.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Loads every resource from the given files, directories or `-`.
    ///
    /// # Errors
    ///
    /// Returns an error if a path is missing or a document is malformed.
    pub fn load_paths(&self, paths: &[PathBuf]) -> Result<Vec<Resource>> {
        let mut resources = Vec::new();
        for path in paths {
            resources.extend(self.load_path(path)?);
        }
        info!("Loaded {} resources from {} paths", resources.len(), paths.len());
        Ok(resources)
    }

    /// Loads one file, directory (recursively, in name order) or `-`.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is missing or a document is malformed.
    pub fn load_path(&self, path: &Path) -> Result<Vec<Resource>> {
        if path.as_os_str() == STDIN_PATH {
            let mut content = String::new();
            std::io::stdin().read_to_string(&mut content)?;
            return self.parse_documents(&content, "<stdin>");
        }

        if !path.exists() {
            return Err(DriftError::Config(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }));
        }

        if path.is_dir() {
            let mut entries = std::fs::read_dir(path)?
                .map(|entry| entry.map(|e| e.path()))
                .collect::<std::io::Result<Vec<_>>>()?;
            entries.sort();

            let mut resources = Vec::new();
            for entry in entries {
                if entry.is_dir() || has_manifest_extension(&entry) {
                    resources.extend(self.load_path(&entry)?);
                }
            }
            return Ok(resources);
        }

        debug!("Reading manifest: {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::parse(
                format!("Failed to read file: {e}"),
                Some(path.display().to_string()),
            )
        })?;
        self.parse_documents(&content, &path.display().to_string())
    }

    /// Parses a YAML (or JSON, which is valid YAML) stream into resources.
    ///
    /// # Errors
    ///
    /// Returns an error if a document is not valid YAML or is not a
    /// resource.
    pub fn parse_documents(&self, content: &str, location: &str) -> Result<Vec<Resource>> {
        let mut resources = Vec::new();

        for (index, document) in serde_yaml::Deserializer::from_str(content).enumerate() {
            let doc_location = format!("{location} (document {})", index + 1);
            let value = Value::deserialize(document).map_err(|e| {
                ConfigError::parse(format!("YAML parse error: {e}"), Some(doc_location.clone()))
            })?;

            if value.is_null() {
                continue;
            }
            flatten_into(value, &doc_location, &mut resources)?;
        }

        debug!("Parsed {} resources from {location}", resources.len());
        Ok(resources)
    }
}

fn has_manifest_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| MANIFEST_EXTENSIONS.contains(&ext))
}

fn flatten_into(value: Value, location: &str, out: &mut Vec<Resource>) -> Result<()> {
    let is_list = value
        .get("kind")
        .and_then(Value::as_str)
        .is_some_and(|kind| kind.ends_with("List"))
        && value.get("items").is_some_and(Value::is_array);

    if is_list {
        if let Value::Object(mut map) = value
            && let Some(Value::Array(items)) = map.remove("items")
        {
            for item in items {
                flatten_into(item, location, out)?;
            }
        }
        return Ok(());
    }

    out.push(Resource::from_value(value, Some(location))?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_document_yaml() {
        let yaml = r"
apiVersion: v1
kind: ConfigMap
metadata:
  name: settings
data:
  mode: fast
---
---
apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
  namespace: prod
";
        let resources = ManifestLoader::new()
            .parse_documents(yaml, "app.yaml")
            .expect("valid stream");

        assert_eq!(resources.len(), 2);
        assert_eq!(resources[0].kind(), "ConfigMap");
        assert_eq!(resources[0].object()["data"]["mode"], "fast");
        assert_eq!(resources[1].fq_name(), "prod.web");
    }

    #[test]
    fn test_json_document() {
        let json = r#"{"apiVersion": "v1", "kind": "Pod", "metadata": {"name": "x"}, "spec": {"replicas": 0}}"#;
        let resources = ManifestLoader::new()
            .parse_documents(json, "pod.json")
            .expect("json is yaml");
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].object()["spec"]["replicas"], 0);
    }

    #[test]
    fn test_lists_are_flattened() {
        let yaml = r"
apiVersion: v1
kind: List
items:
  - apiVersion: v1
    kind: Pod
    metadata: { name: a }
  - apiVersion: v1
    kind: PodList
    items:
      - apiVersion: v1
        kind: Pod
        metadata: { name: b }
";
        let resources = ManifestLoader::new()
            .parse_documents(yaml, "list.yaml")
            .expect("valid list");
        let names: Vec<_> = resources.iter().map(Resource::name).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn test_document_without_kind_is_rejected() {
        let err = ManifestLoader::new()
            .parse_documents("apiVersion: v1\nmetadata: {name: x}\n", "bad.yaml")
            .expect_err("kind is required");
        assert!(err.to_string().contains("bad.yaml (document 1)"));
    }

    #[test]
    fn test_load_directory_in_name_order() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        std::fs::write(
            dir.path().join("b.yaml"),
            "apiVersion: v1\nkind: Pod\nmetadata: {name: second}\n",
        )
        .expect("write");
        std::fs::write(
            dir.path().join("a.json"),
            r#"{"apiVersion": "v1", "kind": "Pod", "metadata": {"name": "first"}}"#,
        )
        .expect("write");
        std::fs::write(dir.path().join("notes.txt"), "not a manifest").expect("write");

        let resources = ManifestLoader::new()
            .load_paths(&[dir.path().to_path_buf()])
            .expect("directory loads");
        let names: Vec<_> = resources.iter().map(Resource::name).collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[test]
    fn test_missing_path() {
        let result = ManifestLoader::new().load_path(Path::new("/definitely/not/here.yaml"));
        assert!(matches!(
            result,
            Err(DriftError::Config(ConfigError::FileNotFound { .. }))
        ));
    }
}
