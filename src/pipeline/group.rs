//! Regrouping flat results by source chunk.
//!
//! Image ids are synthesized as `<chunk_key>_<index>`, so the chunk key is
//! recovered by splitting on the last underscore. A chunk key whose own
//! tail looks like an index (`cam_2`) is therefore ambiguous; the split is
//! kept as-is because the id string is the wire format persisted
//! downstream.

use super::types::{GroupedResults, PerImageResult};

/// Group flat results by chunk key.
///
/// Each chunk's list is in arrival order, which for concurrent dispatch is
/// completion order rather than index order. Ids without an underscore
/// group under the whole id.
pub fn group_by_chunk(results: Vec<PerImageResult>) -> GroupedResults {
    let mut grouped = GroupedResults::new();
    for entry in results {
        let chunk_key = match entry.image.rsplit_once('_') {
            Some((key, _)) => key.to_string(),
            None => entry.image.clone(),
        };
        grouped.entry(chunk_key).or_default().push(entry);
    }

    for (chunk_key, entries) in &grouped {
        tracing::info!(chunk_key = %chunk_key, frames = entries.len(), "Summarized chunk");
    }

    grouped
}
