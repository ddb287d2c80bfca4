//! Live store trait definition.
//!
//! This module defines the common interface for live object backends.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;
use crate::resource::ResourceId;

/// Trait for live object backends.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LiveStore: Send + Sync {
    /// Fetches the live object for `id`.
    ///
    /// Returns `None` when the store has no such object. Any other failure
    /// is an error.
    async fn get(&self, id: &ResourceId) -> Result<Option<Value>, StoreError>;

    /// Gets the backend type name.
    fn backend_type(&self) -> &'static str;
}

#[async_trait]
impl LiveStore for Box<dyn LiveStore> {
    async fn get(&self, id: &ResourceId) -> Result<Option<Value>, StoreError> {
        (**self).get(id).await
    }

    fn backend_type(&self) -> &'static str {
        (**self).backend_type()
    }
}
