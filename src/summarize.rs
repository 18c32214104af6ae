//! Per-frame summarization.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::normalize::normalize_summary;
use crate::pipeline::PerImageResult;
use crate::vision::VisionProvider;

/// Instruction sent with every frame.
const SUMMARY_PROMPT: &str = "You are an expert vision assistant. Provide a concise JSON summary for \
    the provided video frame. Respond with JSON only (no code fences). Use the schema: \
    {\"summary\": \"<1-2 sentences>\", \"objects\": [\"...\"], \"actions\": [\"...\"], \
    \"setting\": \"<location or scene>\", \"quality\": \"<good|low>\"}";

/// Encode image bytes as an inline data URI.
pub fn to_data_uri(bytes: &[u8], mime_hint: &str) -> String {
    format!("data:image/{};base64,{}", mime_hint, BASE64.encode(bytes))
}

/// Summarize one image.
///
/// The provider is called exactly once; a failure is captured in the
/// result, never retried or escalated. An empty payload is rejected
/// without calling the provider at all.
pub async fn summarize_image<P>(
    provider: &P,
    image_id: &str,
    bytes: &[u8],
    mime_hint: &str,
) -> PerImageResult
where
    P: VisionProvider + ?Sized,
{
    if bytes.is_empty() {
        tracing::warn!(image_id, "Empty image payload");
        return PerImageResult::failure(image_id, "Empty image payload");
    }

    let data_uri = to_data_uri(bytes, mime_hint);
    match provider.describe_image(SUMMARY_PROMPT, &data_uri).await {
        Ok(reply) => PerImageResult::success(image_id, normalize_summary(&reply)),
        Err(e) => {
            tracing::warn!(image_id, error = %e, "Summarization failed");
            PerImageResult::failure(image_id, e.to_string())
        }
    }
}
