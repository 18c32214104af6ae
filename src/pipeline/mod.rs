//! Frame summarization pipeline.
//!
//! ```text
//! chunk map ──flatten──► ImageUnit × N
//!                             │
//!                             ▼  batches of `batch_size`,
//!                                ≤ `max_workers` in flight
//!                     Frame Summarizer (one request per frame)
//!                             │
//!                             ▼  completion order
//!                      Grouping Stage ──► chunk_key → [PerImageResult]
//! ```
//!
//! The dispatcher collects results as batches finish; the grouping stage
//! restores per-chunk association afterwards.

mod dispatch;
mod group;
mod types;

pub use dispatch::dispatch_batches;
pub use group::group_by_chunk;
pub use types::{GroupedResults, ImageUnit, PerImageResult};
