//! Resource documents and their identity.

use serde_json::Value;
use std::fmt;

use crate::error::ConfigError;

use super::naming::KindNamer;

/// A structured resource document, declared locally or fetched live.
///
/// The document is kept as a [`Value`] so that nested mappings, sequences
/// and scalars are represented by one closed set of variants.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    /// The full document.
    object: Value,
}

/// Key used to look a resource up in a live store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId {
    /// API version (`v1`, `apps/v1`, ...).
    pub api_version: String,
    /// Kind (`Pod`, `ConfigMap`, ...).
    pub kind: String,
    /// Namespace, `None` for cluster-scoped kinds.
    pub namespace: Option<String>,
    /// Object name.
    pub name: String,
}

impl Resource {
    /// Wraps a document, checking that it carries `kind` and `apiVersion`.
    ///
    /// An empty or missing name is accepted here; it is reported per
    /// resource when the resource is compared.
    ///
    /// # Errors
    ///
    /// Returns a parse error if the document is not a mapping or lacks a
    /// non-empty `kind` or `apiVersion`.
    pub fn from_value(object: Value, location: Option<&str>) -> Result<Self, ConfigError> {
        let location = location.map(String::from);
        let Some(map) = object.as_object() else {
            return Err(ConfigError::parse("resource document is not a mapping", location));
        };

        for field in ["kind", "apiVersion"] {
            let present = map
                .get(field)
                .and_then(Value::as_str)
                .is_some_and(|s| !s.is_empty());
            if !present {
                return Err(ConfigError::parse(
                    format!("resource document has no {field} set"),
                    location,
                ));
            }
        }

        Ok(Self { object })
    }

    /// Returns the underlying document.
    #[must_use]
    pub const fn object(&self) -> &Value {
        &self.object
    }

    /// Consumes the resource and returns the document.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.object
    }

    /// Returns the kind.
    #[must_use]
    pub fn kind(&self) -> &str {
        self.object.get("kind").and_then(Value::as_str).unwrap_or_default()
    }

    /// Returns the API version.
    #[must_use]
    pub fn api_version(&self) -> &str {
        self.object
            .get("apiVersion")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Returns `metadata.name`, or an empty string when unset.
    #[must_use]
    pub fn name(&self) -> &str {
        self.metadata_str("name").unwrap_or_default()
    }

    /// Returns `metadata.namespace` when set and non-empty.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.metadata_str("namespace").filter(|ns| !ns.is_empty())
    }

    /// Returns the namespace-qualified name: `namespace.name` or `name`.
    #[must_use]
    pub fn fq_name(&self) -> String {
        self.namespace().map_or_else(
            || self.name().to_string(),
            |ns| format!("{ns}.{}", self.name()),
        )
    }

    /// Builds the lookup key, filling in `default_namespace` for namespaced
    /// kinds that do not declare one.
    #[must_use]
    pub fn id(&self, namer: &KindNamer, default_namespace: &str) -> ResourceId {
        let namespace = if namer.is_namespaced(self.kind()) {
            Some(self.namespace().unwrap_or(default_namespace).to_string())
        } else {
            None
        };

        ResourceId {
            api_version: self.api_version().to_string(),
            kind: self.kind().to_string(),
            namespace,
            name: self.name().to_string(),
        }
    }

    fn metadata_str(&self, key: &str) -> Option<&str> {
        self.object
            .get("metadata")
            .and_then(|metadata| metadata.get(key))
            .and_then(Value::as_str)
    }
}

impl ResourceId {
    /// Splits the API version into group and version; the core group is empty.
    #[must_use]
    pub fn group_version(&self) -> (&str, &str) {
        self.api_version
            .split_once('/')
            .unwrap_or(("", self.api_version.as_str()))
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{} {ns}/{}", self.kind, self.name),
            None => write!(f, "{} {}", self.kind, self.name),
        }
    }
}

/// Sorts resources by kind, namespace and name.
///
/// Ties fall back to the API version and then the compact document text, so
/// every permutation of the same set ends up in the same order.
pub fn sort_resources(resources: &mut [Resource]) {
    resources.sort_by_cached_key(|r| {
        (
            r.kind().to_string(),
            r.namespace().unwrap_or_default().to_string(),
            r.name().to_string(),
            r.api_version().to_string(),
            r.object.to_string(),
        )
    });
}
