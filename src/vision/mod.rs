//! Vision model provider abstraction.
//!
//! One trait, one concrete backend. The provider is passed into the
//! pipeline explicitly so hosts pick the backend and tests substitute
//! fakes; nothing resolves a client from ambient state.

pub mod groq;

use anyhow::Result;
use async_trait::async_trait;

pub use groq::GroqVision;

/// A vision-capable chat model reachable over the network.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Describe one image.
    ///
    /// `image_data_uri` is a base64 `data:` URI carrying the image inline.
    /// Returns the raw textual reply, unparsed; normalization happens in
    /// the caller.
    async fn describe_image(&self, prompt: &str, image_data_uri: &str) -> Result<String>;
}
