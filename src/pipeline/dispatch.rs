//! Bounded-concurrency batch dispatch.

use futures::stream::{self, StreamExt};

use crate::config::PipelineOptions;
use crate::summarize::summarize_image;
use crate::vision::VisionProvider;

use super::types::{ImageUnit, PerImageResult};

/// Partition `units` into contiguous batches and run them with at most
/// `max_workers` batches in flight.
///
/// Frames within a batch are summarized sequentially, so the worker bound
/// is also the bound on concurrent requests to the vision service. Results
/// are collected in completion order; the grouping stage restores
/// per-chunk association downstream. One frame's failure is captured in
/// its own result and aborts neither its batch nor any other.
pub async fn dispatch_batches<P>(
    provider: &P,
    units: Vec<ImageUnit>,
    options: &PipelineOptions,
) -> Vec<PerImageResult>
where
    P: VisionProvider + ?Sized,
{
    if units.is_empty() {
        tracing::debug!("No frames to dispatch");
        return Vec::new();
    }

    let batch_size = options.batch_size.max(1);
    let max_workers = options.max_workers.max(1);

    let frame_count = units.len();
    let batches: Vec<Vec<ImageUnit>> = units
        .chunks(batch_size)
        .map(|batch| batch.to_vec())
        .collect();

    tracing::debug!(
        frames = frame_count,
        batches = batches.len(),
        max_workers,
        "Dispatching summarization batches"
    );

    stream::iter(batches)
        .map(|batch| process_batch(provider, batch))
        .buffer_unordered(max_workers)
        .collect::<Vec<Vec<PerImageResult>>>()
        .await
        .into_iter()
        .flatten()
        .collect()
}

/// Summarize one batch sequentially.
async fn process_batch<P>(provider: &P, batch: Vec<ImageUnit>) -> Vec<PerImageResult>
where
    P: VisionProvider + ?Sized,
{
    let mut results = Vec::with_capacity(batch.len());
    for unit in batch {
        let image_id = unit.image_id();
        results.push(summarize_image(provider, &image_id, &unit.bytes, "jpeg").await);
    }
    results
}
