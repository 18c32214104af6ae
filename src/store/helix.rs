//! Helix graph store backend.
//!
//! Each named query is a POST of its parameters to `<base>/<QueryName>`.

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;

use super::GraphStore;

/// Errors surfaced by the Helix HTTP API.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("query '{query}' failed with HTTP {status}: {body}")]
    Query {
        query: String,
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Client for a Helix graph/vector store instance.
pub struct HelixStore {
    client: reqwest::Client,
    base_url: String,
}

impl HelixStore {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Use a caller-configured client (timeouts, proxies).
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Run one named query and return the reply verbatim.
    async fn query(&self, name: &str, params: Value) -> Result<Value, StoreError> {
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, name))
            .json(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Query {
                query: name.to_string(),
                status,
                body,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl GraphStore for HelixStore {
    async fn create_image(
        &self,
        file_id: &str,
        content: &str,
        path: &str,
    ) -> anyhow::Result<Value> {
        let reply = self
            .query(
                "CreateImage",
                json!({ "file_id": file_id, "content": content, "path": path }),
            )
            .await?;
        tracing::debug!(file_id, reply = %reply, "Created image node");
        Ok(reply)
    }

    async fn create_image_embeddings(
        &self,
        file_id: &str,
        content: &str,
        path: &str,
    ) -> anyhow::Result<Value> {
        let reply = self
            .query(
                "CreateImageEmbeddings",
                json!({ "file_id": file_id, "content": content, "path": path }),
            )
            .await?;
        tracing::debug!(file_id, reply = %reply, "Created image embeddings");
        Ok(reply)
    }
}
