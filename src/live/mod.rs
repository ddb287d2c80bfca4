//! Live object stores.
//!
//! This module provides read-only access to the live counterparts of
//! declared resources, either from an exported snapshot or from an HTTP API.

mod http;
mod snapshot;
mod store;

pub use http::{ApiStore, DEFAULT_TIMEOUT_SECS};
pub use snapshot::SnapshotStore;
pub use store::LiveStore;

#[cfg(test)]
pub use store::MockLiveStore;
