//! HTTP live store.
//!
//! This module fetches live objects from a Kubernetes-style REST API:
//! `/api/{version}` for the core group, `/apis/{group}/{version}` otherwise,
//! then `/namespaces/{namespace}` for namespaced kinds and finally
//! `/{resource}/{name}`.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, trace};

use crate::error::StoreError;
use crate::resource::{KindNamer, ResourceId};

use super::store::LiveStore;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Live store backed by an API server.
#[derive(Debug, Clone)]
pub struct ApiStore {
    /// HTTP client.
    client: Client,
    /// Server base URL without a trailing slash.
    base_url: String,
    /// Bearer token, if the server needs one.
    token: Option<String>,
    /// Kind to resource name mapping.
    namer: KindNamer,
}

impl ApiStore {
    /// Creates a store with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(base_url: &str, token: Option<String>, namer: KindNamer) -> Result<Self, StoreError> {
        Self::with_timeout(base_url, token, namer, DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a store with a custom per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_timeout(
        base_url: &str,
        token: Option<String>,
        namer: KindNamer,
        timeout_secs: u64,
    ) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| StoreError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            namer,
        })
    }

    /// Builds the URL of one object.
    #[must_use]
    pub fn object_url(&self, id: &ResourceId) -> String {
        let mut url = match id.group_version() {
            ("", version) => format!("{}/api/{version}", self.base_url),
            (group, version) => format!("{}/apis/{group}/{version}", self.base_url),
        };
        if let Some(ns) = &id.namespace {
            url.push_str("/namespaces/");
            url.push_str(ns);
        }
        url.push('/');
        url.push_str(&self.namer.resource_name(&id.kind));
        url.push('/');
        url.push_str(&id.name);
        url
    }
}

#[async_trait]
impl LiveStore for ApiStore {
    async fn get(&self, id: &ResourceId) -> Result<Option<Value>, StoreError> {
        let url = self.object_url(id);
        trace!("GET {url}");

        let mut request = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StoreError::network(format!("Request failed: {e}")))?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!("{id} doesn't exist on the server");
            return Ok(None);
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(StoreError::Unauthorized {
                message: format!("server answered {status}"),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::api_error(status.as_u16(), body.trim()));
        }

        let object: Value = response.json().await.map_err(|e| StoreError::InvalidResponse {
            message: format!("Failed to parse response: {e}"),
        })?;

        if !object.is_object() {
            return Err(StoreError::InvalidResponse {
                message: String::from("response body is not an object"),
            });
        }

        Ok(Some(object))
    }

    fn backend_type(&self) -> &'static str {
        "api"
    }
}
