//! Mapping from kinds to REST resource names.
//!
//! Live lookups and report labels both use the plural, lowercase resource
//! name of a kind (`Pod` → `pods`). Common kinds are known up front;
//! anything else falls back to English pluralization and is assumed to be
//! namespaced unless the settings say otherwise.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// REST naming facts about one kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindInfo {
    /// Plural lowercase resource name.
    pub plural: String,
    /// Whether objects of this kind live inside a namespace.
    #[serde(default = "default_namespaced")]
    pub namespaced: bool,
}

/// Resolves kinds to resource names and scope.
#[derive(Debug, Clone, Default)]
pub struct KindNamer {
    /// Per-kind overrides, consulted before the built-in table.
    overrides: HashMap<String, KindInfo>,
}

/// Kinds whose objects are not namespaced.
const CLUSTER_SCOPED: &[&str] = &[
    "APIService",
    "CertificateSigningRequest",
    "ClusterRole",
    "ClusterRoleBinding",
    "ComponentStatus",
    "CustomResourceDefinition",
    "IngressClass",
    "MutatingWebhookConfiguration",
    "Namespace",
    "Node",
    "PersistentVolume",
    "PriorityClass",
    "RuntimeClass",
    "StorageClass",
    "ValidatingWebhookConfiguration",
    "VolumeAttachment",
];

/// Kinds whose resource name is not a plain pluralization.
const IRREGULAR: &[(&str, &str)] = &[
    ("Endpoints", "endpoints"),
    ("PodSecurityPolicy", "podsecuritypolicies"),
    ("NetworkPolicy", "networkpolicies"),
    ("PriorityClass", "priorityclasses"),
    ("StorageClass", "storageclasses"),
    ("IngressClass", "ingressclasses"),
    ("RuntimeClass", "runtimeclasses"),
    ("Ingress", "ingresses"),
];

const fn default_namespaced() -> bool {
    true
}

impl KindNamer {
    /// Creates a namer with only the built-in knowledge.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a namer with additional per-kind overrides.
    #[must_use]
    pub const fn with_overrides(overrides: HashMap<String, KindInfo>) -> Self {
        Self { overrides }
    }

    /// Returns the naming facts for a kind.
    #[must_use]
    pub fn lookup(&self, kind: &str) -> KindInfo {
        if let Some(info) = self.overrides.get(kind) {
            return info.clone();
        }

        let plural = IRREGULAR
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or_else(|| pluralize(&kind.to_lowercase()), |(_, p)| (*p).to_string());

        KindInfo {
            plural,
            namespaced: !CLUSTER_SCOPED.contains(&kind),
        }
    }

    /// Returns the plural resource name used in labels and URLs.
    #[must_use]
    pub fn resource_name(&self, kind: &str) -> String {
        self.lookup(kind).plural
    }

    /// Returns whether the kind is namespaced.
    #[must_use]
    pub fn is_namespaced(&self, kind: &str) -> bool {
        self.lookup(kind).namespaced
    }
}

fn pluralize(lower: &str) -> String {
    if lower.is_empty() {
        return String::new();
    }
    if let Some(stem) = lower.strip_suffix('y')
        && !stem.ends_with(['a', 'e', 'i', 'o', 'u'])
    {
        return format!("{stem}ies");
    }
    if lower.ends_with('s') || lower.ends_with('x') || lower.ends_with("ch") || lower.ends_with("sh") {
        return format!("{lower}es");
    }
    format!("{lower}s")
}
