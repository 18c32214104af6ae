//! Pipeline types.

use std::collections::HashMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::normalize::SummaryRecord;

/// One frame queued for summarization.
///
/// Ephemeral: produced by flattening a chunk map, consumed once by the
/// summarizer, never persisted.
#[derive(Debug, Clone)]
pub struct ImageUnit {
    pub chunk_key: String,
    pub index: usize,
    pub bytes: Bytes,
}

impl ImageUnit {
    /// Identifier carried through the pipeline and into persisted
    /// payloads.
    pub fn image_id(&self) -> String {
        format!("{}_{}", self.chunk_key, self.index)
    }
}

/// Outcome for one frame. Exactly one of `summary`/`error` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerImageResult {
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PerImageResult {
    pub fn success(image: impl Into<String>, summary: SummaryRecord) -> Self {
        Self {
            image: image.into(),
            summary: Some(summary),
            error: None,
        }
    }

    pub fn failure(image: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            summary: None,
            error: Some(error.into()),
        }
    }
}

/// Per-chunk results, each list in arrival order.
pub type GroupedResults = HashMap<String, Vec<PerImageResult>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_id_joins_key_and_index() {
        let unit = ImageUnit {
            chunk_key: "clip-a".to_string(),
            index: 3,
            bytes: Bytes::from_static(b"x"),
        };
        assert_eq!(unit.image_id(), "clip-a_3");
    }

    #[test]
    fn absent_fields_are_not_serialized() {
        let result = PerImageResult::failure("a_0", "boom");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["image"], "a_0");
        assert_eq!(json["error"], "boom");
        assert!(json.get("summary").is_none());
    }
}
