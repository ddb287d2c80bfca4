//! Snapshot-backed live store.
//!
//! This module serves live objects from exported manifests (for example the
//! JSON output of a cluster dump), which makes offline drift checks and
//! tests possible without a running API server.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::resource::{KindNamer, Resource, ResourceId};

use super::store::LiveStore;

/// Lookup key: kind, namespace and name. The API version is ignored because
/// an API server serves one object under every version of its group.
type SnapshotKey = (String, Option<String>, String);

/// In-memory live store built from exported objects.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    /// Objects by identity.
    objects: HashMap<SnapshotKey, Value>,
}

impl SnapshotStore {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes exported objects, resolving namespaces the same way declared
    /// resources are resolved. Later duplicates replace earlier ones.
    #[must_use]
    pub fn from_resources(
        resources: Vec<Resource>,
        namer: &KindNamer,
        default_namespace: &str,
    ) -> Self {
        let mut store = Self::new();
        for resource in resources {
            let id = resource.id(namer, default_namespace);
            if id.name.is_empty() {
                warn!("Skipping live {} without a name", id.kind);
                continue;
            }
            store.insert(&id, resource.into_value());
        }
        debug!("Indexed {} live objects", store.len());
        store
    }

    /// Adds or replaces one object.
    pub fn insert(&mut self, id: &ResourceId, object: Value) {
        if self.objects.insert(key(id), object).is_some() {
            warn!("Duplicate live object {id}, keeping the last one");
        }
    }

    /// Returns the number of indexed objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if the snapshot holds no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

fn key(id: &ResourceId) -> SnapshotKey {
    (id.kind.clone(), id.namespace.clone(), id.name.clone())
}

#[async_trait]
impl LiveStore for SnapshotStore {
    async fn get(&self, id: &ResourceId) -> Result<Option<Value>, StoreError> {
        Ok(self.objects.get(&key(id)).cloned())
    }

    fn backend_type(&self) -> &'static str {
        "snapshot"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn live(kind: &str, namespace: Option<&str>, name: &str, marker: u32) -> Resource {
        let mut metadata = json!({ "name": name });
        if let Some(ns) = namespace {
            metadata["namespace"] = json!(ns);
        }
        Resource::from_value(
            json!({ "apiVersion": "v1", "kind": kind, "metadata": metadata, "marker": marker }),
            None,
        )
        .expect("valid resource")
    }

    #[tokio::test]
    async fn test_lookup_uses_default_namespace() {
        let namer = KindNamer::new();
        let store = SnapshotStore::from_resources(
            vec![live("Pod", None, "x", 1), live("Pod", Some("other"), "x", 2)],
            &namer,
            "default",
        );
        assert_eq!(store.len(), 2);

        let declared = live("Pod", Some("default"), "x", 0);
        let found = store
            .get(&declared.id(&namer, "default"))
            .await
            .expect("get should not fail")
            .expect("object should exist");
        assert_eq!(found["marker"], 1);
    }

    #[tokio::test]
    async fn test_missing_object_is_none() {
        let namer = KindNamer::new();
        let store = SnapshotStore::new();
        let declared = live("ConfigMap", Some("default"), "y", 0);
        let found = store
            .get(&declared.id(&namer, "default"))
            .await
            .expect("get should not fail");
        assert!(found.is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_api_version_is_ignored() {
        let namer = KindNamer::new();
        let store =
            SnapshotStore::from_resources(vec![live("Pod", None, "x", 7)], &namer, "default");
        let mut id = live("Pod", None, "x", 0).id(&namer, "default");
        id.api_version = String::from("v2");
        let found = store.get(&id).await.expect("get should not fail");
        assert!(found.is_some());
    }

    #[test]
    fn test_duplicates_keep_last() {
        let namer = KindNamer::new();
        let store = SnapshotStore::from_resources(
            vec![live("Pod", None, "x", 1), live("Pod", None, "x", 2)],
            &namer,
            "default",
        );
        assert_eq!(store.len(), 1);
    }
}
