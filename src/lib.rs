//! Glance Core - vision summarization and frame indexing
//!
//! This crate contains the summarization pipeline for Glance, including:
//! - Normalization of model output into a fixed summary schema
//! - Per-frame summarization against a vision-capable model
//! - Bounded-concurrency batch dispatch over frame sets
//! - Regrouping of flat results by source chunk
//! - Orchestration that persists summaries to an external graph store
//!
//! External services (the vision model and the graph store) are reached
//! through the [`VisionProvider`] and [`GraphStore`] traits so tests and
//! hosts can substitute their own backends.

pub mod config;
pub mod embedding;
pub mod hash;
pub mod indexer;
pub mod normalize;
pub mod pipeline;
pub mod store;
pub mod summarize;
pub mod vision;

pub use config::PipelineOptions;
pub use embedding::build_embedding_text;
pub use indexer::{index_paths, summarize_frames, IndexResult};
pub use normalize::{normalize_summary, SummaryRecord};
pub use pipeline::{GroupedResults, ImageUnit, PerImageResult};
pub use store::{GraphStore, HelixStore};
pub use vision::{GroqVision, VisionProvider};
