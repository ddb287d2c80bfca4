//! Resource model for declared and live objects.
//!
//! This module defines the document type shared by manifests and live
//! objects, its identity, the deterministic report ordering, and the
//! mapping from kinds to REST resource names.

mod naming;
mod types;

pub use naming::{KindInfo, KindNamer};
pub use types::{Resource, ResourceId, sort_resources};
