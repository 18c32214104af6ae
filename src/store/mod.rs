//! Graph store client.
//!
//! Persistence is an external HTTP service exposing named queries. The
//! pipeline fires requests and logs replies; nothing downstream interprets
//! them. The trait is the injection seam: the indexer takes any
//! [`GraphStore`], and tests substitute counting fakes.

mod helix;

pub use helix::{HelixStore, StoreError};

use async_trait::async_trait;
use serde_json::Value;

/// External graph/vector store consumed by the indexer.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Create the image node for `file_id`. `content` is the
    /// JSON-serialized summary payload.
    async fn create_image(&self, file_id: &str, content: &str, path: &str)
        -> anyhow::Result<Value>;

    /// Store embedding text for `file_id`.
    async fn create_image_embeddings(
        &self,
        file_id: &str,
        content: &str,
        path: &str,
    ) -> anyhow::Result<Value>;
}
