//! Pipeline configuration.

/// Dispatch bounds for batched summarization.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Frames grouped per worker batch.
    pub batch_size: usize,
    /// Maximum batches in flight at once. One worker issues one request at
    /// a time, so this also bounds concurrent requests to the vision
    /// service.
    pub max_workers: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            batch_size: 5,
            max_workers: 4,
        }
    }
}
