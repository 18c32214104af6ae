//! Indexing orchestration.
//!
//! Two entry points:
//! - [`index_paths`]: summarize and persist individual image files, one
//!   path fully processed before the next.
//! - [`summarize_frames`]: run the batched pipeline over an in-memory
//!   chunk map; persistence is the caller's responsibility.
//!
//! Nothing here is transactional. A crash mid-loop leaves already-indexed
//! paths persisted and the rest untouched, and re-running re-indexes
//! everything under fresh file ids.

use std::collections::HashMap;
use std::path::Path;

use bytes::Bytes;
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::config::PipelineOptions;
use crate::embedding::build_embedding_text;
use crate::pipeline::{dispatch_batches, group_by_chunk, GroupedResults, ImageUnit};
use crate::store::GraphStore;
use crate::summarize::summarize_image;
use crate::vision::VisionProvider;

/// Per-path outcome of [`index_paths`].
///
/// `file_id` is assigned once a summary exists, so a persistence failure
/// still reports the id it was attempted under.
#[derive(Debug, Clone, Serialize)]
pub struct IndexResult {
    pub path: String,
    pub file_id: Option<String>,
    pub indexed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IndexResult {
    fn skipped(path: &str, error: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            file_id: None,
            indexed: false,
            error: Some(error.into()),
        }
    }
}

/// Summarize and persist each path in order.
///
/// Every input path appears in the returned report exactly once; failures
/// are captured per path and never abort the loop.
pub async fn index_paths<P, S>(provider: &P, store: &S, paths: &[String]) -> Vec<IndexResult>
where
    P: VisionProvider + ?Sized,
    S: GraphStore + ?Sized,
{
    if paths.is_empty() {
        tracing::info!("No file paths provided, skipping image indexing");
        return Vec::new();
    }

    let mut results = Vec::with_capacity(paths.len());
    for path in paths {
        results.push(index_one(provider, store, path).await);
    }
    results
}

async fn index_one<P, S>(provider: &P, store: &S, path: &str) -> IndexResult
where
    P: VisionProvider + ?Sized,
    S: GraphStore + ?Sized,
{
    if !Path::new(path).exists() {
        tracing::warn!(path, "Skipping: not found");
        return IndexResult::skipped(path, "Path not found");
    }

    let bytes = match tokio::fs::read(path).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(path, error = %e, "Skipping: bytes extraction failed");
            return IndexResult::skipped(path, format!("Bytes extraction failed: {e}"));
        }
    };

    let image_id = Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());

    let result = summarize_image(provider, &image_id, &bytes, mime_hint_for(path)).await;
    let summary = match result.summary {
        Some(s) => s,
        None => {
            let error = result
                .error
                .unwrap_or_else(|| "Summary failed".to_string());
            tracing::warn!(path, error = %error, "Skipping: summary failed");
            return IndexResult::skipped(path, error);
        }
    };

    // A file id exists from here on, even if persistence fails below.
    let file_id = Uuid::new_v4().to_string();

    let payload = json!({
        "path": path,
        "summary": summary,
        "created_at": chrono::Utc::now().to_rfc3339(),
    });
    let embedding_text = build_embedding_text(&summary);

    let persisted = async {
        store.create_image(&file_id, &payload.to_string(), path).await?;
        store
            .create_image_embeddings(&file_id, &embedding_text, path)
            .await?;
        anyhow::Ok(())
    }
    .await;

    match persisted {
        Ok(()) => {
            tracing::info!(path, file_id = %file_id, "Indexed image");
            IndexResult {
                path: path.to_string(),
                file_id: Some(file_id),
                indexed: true,
                error: None,
            }
        }
        Err(e) => {
            tracing::error!(path, file_id = %file_id, error = %e, "Indexing failed");
            IndexResult {
                path: path.to_string(),
                file_id: Some(file_id),
                indexed: false,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Run the batched pipeline over an in-memory chunk map.
///
/// Frames are flattened in key order, then index order, dispatched with
/// the configured bounds, and regrouped by chunk. No persistence happens
/// here; callers decide what to do with the grouped results.
pub async fn summarize_frames<P>(
    provider: &P,
    options: &PipelineOptions,
    frames: &HashMap<String, Vec<Bytes>>,
) -> GroupedResults
where
    P: VisionProvider + ?Sized,
{
    if frames.is_empty() {
        tracing::info!("No frames provided, skipping summarization");
        return GroupedResults::new();
    }

    let mut keys: Vec<&String> = frames.keys().collect();
    keys.sort();

    let mut units = Vec::new();
    for key in keys {
        for (index, bytes) in frames[key].iter().enumerate() {
            units.push(ImageUnit {
                chunk_key: key.clone(),
                index,
                bytes: bytes.clone(),
            });
        }
    }

    let flat = dispatch_batches(provider, units, options).await;
    group_by_chunk(flat)
}

/// Format hint for the data URI, taken from the file extension.
fn mime_hint_for(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "png",
        Some("gif") => "gif",
        Some("webp") => "webp",
        _ => "jpeg",
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::Value;

    use crate::summarize::to_data_uri;

    use super::*;

    struct FakeVision {
        calls: AtomicUsize,
        fail_uri: Option<String>,
    }

    impl FakeVision {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_uri: None,
            }
        }

        fn failing_on(bytes: &[u8], mime_hint: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_uri: Some(to_data_uri(bytes, mime_hint)),
            }
        }
    }

    #[async_trait]
    impl VisionProvider for FakeVision {
        async fn describe_image(
            &self,
            _prompt: &str,
            image_data_uri: &str,
        ) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_uri.as_deref() == Some(image_data_uri) {
                anyhow::bail!("model unavailable");
            }
            Ok(r#"{"summary": "a frame", "objects": ["thing"]}"#.to_string())
        }
    }

    struct FakeStore {
        images: AtomicUsize,
        embeddings: AtomicUsize,
        fail: bool,
    }

    impl FakeStore {
        fn new() -> Self {
            Self {
                images: AtomicUsize::new(0),
                embeddings: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }

        fn total_calls(&self) -> usize {
            self.images.load(Ordering::SeqCst) + self.embeddings.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GraphStore for FakeStore {
        async fn create_image(
            &self,
            _file_id: &str,
            _content: &str,
            _path: &str,
        ) -> anyhow::Result<Value> {
            if self.fail {
                anyhow::bail!("store unreachable");
            }
            self.images.fetch_add(1, Ordering::SeqCst);
            Ok(Value::Null)
        }

        async fn create_image_embeddings(
            &self,
            _file_id: &str,
            _content: &str,
            _path: &str,
        ) -> anyhow::Result<Value> {
            if self.fail {
                anyhow::bail!("store unreachable");
            }
            self.embeddings.fetch_add(1, Ordering::SeqCst);
            Ok(Value::Null)
        }
    }

    fn temp_image(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn empty_path_list_short_circuits() {
        let provider = FakeVision::new();
        let store = FakeStore::new();
        let results = index_paths(&provider, &store, &[]).await;
        assert!(results.is_empty());
        assert_eq!(store.total_calls(), 0);
    }

    #[tokio::test]
    async fn missing_path_reports_without_any_service_call() {
        let provider = FakeVision::new();
        let store = FakeStore::new();
        let results =
            index_paths(&provider, &store, &["/nonexistent/frame.jpg".to_string()]).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "/nonexistent/frame.jpg");
        assert!(results[0].file_id.is_none());
        assert!(!results[0].indexed);
        assert_eq!(results[0].error.as_deref(), Some("Path not found"));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.total_calls(), 0);
    }

    #[tokio::test]
    async fn one_summary_failure_leaves_the_other_path_indexed() {
        let good = temp_image(b"good-frame");
        let bad = temp_image(b"bad-frame");
        let provider = FakeVision::failing_on(b"bad-frame", "jpeg");
        let store = FakeStore::new();

        let paths = vec![
            good.path().to_string_lossy().into_owned(),
            bad.path().to_string_lossy().into_owned(),
        ];
        let results = index_paths(&provider, &store, &paths).await;

        assert_eq!(results.len(), 2);

        assert!(results[0].indexed);
        assert!(results[0].file_id.is_some());
        assert!(results[0].error.is_none());

        assert!(!results[1].indexed);
        assert!(results[1].file_id.is_none());
        assert_eq!(results[1].error.as_deref(), Some("model unavailable"));

        // Only the successful path reached the store.
        assert_eq!(store.images.load(Ordering::SeqCst), 1);
        assert_eq!(store.embeddings.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn persistence_failure_keeps_the_assigned_file_id() {
        let image = temp_image(b"frame");
        let provider = FakeVision::new();
        let store = FakeStore::failing();

        let paths = vec![image.path().to_string_lossy().into_owned()];
        let results = index_paths(&provider, &store, &paths).await;

        assert_eq!(results.len(), 1);
        assert!(!results[0].indexed);
        assert!(results[0].file_id.is_some());
        assert_eq!(results[0].error.as_deref(), Some("store unreachable"));
    }

    #[tokio::test]
    async fn frames_map_is_summarized_and_grouped() {
        let provider = FakeVision::new();
        let frames = HashMap::from([
            (
                "clip-a".to_string(),
                vec![Bytes::from_static(b"a0"), Bytes::from_static(b"a1")],
            ),
            ("clip-b".to_string(), vec![Bytes::from_static(b"b0")]),
        ]);

        let grouped = summarize_frames(&provider, &PipelineOptions::default(), &frames).await;

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped["clip-a"].len(), 2);
        assert_eq!(grouped["clip-b"].len(), 1);
        assert!(grouped
            .values()
            .flatten()
            .all(|entry| entry.summary.is_some()));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn empty_frames_map_short_circuits() {
        let provider = FakeVision::new();
        let grouped =
            summarize_frames(&provider, &PipelineOptions::default(), &HashMap::new()).await;
        assert!(grouped.is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn mime_hint_follows_the_extension() {
        assert_eq!(mime_hint_for("a/b/frame.PNG"), "png");
        assert_eq!(mime_hint_for("frame.webp"), "webp");
        assert_eq!(mime_hint_for("frame.jpg"), "jpeg");
        assert_eq!(mime_hint_for("frame"), "jpeg");
    }
}
