//! Normalization of model output into the fixed summary schema.
//!
//! Vision models reply with loosely structured JSON: sometimes fenced in a
//! code block, sometimes double-encoded as a JSON string, sometimes not
//! JSON at all. This module coerces any reply into a complete
//! [`SummaryRecord`] without ever failing; unusable input degrades into
//! the catch-all `summary` field.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Recursion cap for replies whose summary field itself contains fenced or
/// encoded JSON.
const MAX_NESTING: usize = 3;

/// Normalized description of one image or video frame.
///
/// Every field is present after normalization even when the raw reply was
/// missing or malformed; absent fields default to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub objects: Vec<String>,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub setting: String,
    /// Text read out of the image, when the call site asked for OCR.
    #[serde(default)]
    pub ocr: String,
    #[serde(default)]
    pub quality: String,
}

/// Coerce raw model output into a [`SummaryRecord`].
///
/// Total function: input that cannot be interpreted as the expected schema
/// is returned whole in the `summary` field with every other field empty.
pub fn normalize_summary(raw: &str) -> SummaryRecord {
    normalize_at_depth(raw, 0)
}

fn normalize_at_depth(raw: &str, depth: usize) -> SummaryRecord {
    let text = strip_fence(raw.trim());

    let parsed: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(_) => return fallback(text),
    };

    match parsed {
        Value::Object(map) => {
            let mut record = SummaryRecord {
                summary: string_field(&map, "summary"),
                objects: string_list(&map, "objects"),
                actions: string_list(&map, "actions"),
                setting: string_field(&map, "setting"),
                ocr: string_field(&map, "ocr"),
                quality: string_field(&map, "quality"),
            };

            // The summary itself may be another fenced or encoded blob.
            let inner = record.summary.trim();
            if depth < MAX_NESTING && looks_structured(inner) {
                record.summary = normalize_at_depth(inner, depth + 1).summary;
            }
            if record.summary.is_empty() {
                record.summary = text.to_string();
            }
            record
        }
        // Double-encoded reply: a JSON string whose content is the real one.
        Value::String(s) if depth < MAX_NESTING => normalize_at_depth(&s, depth + 1),
        _ => fallback(text),
    }
}

fn fallback(text: &str) -> SummaryRecord {
    SummaryRecord {
        summary: text.to_string(),
        ..SummaryRecord::default()
    }
}

fn looks_structured(text: &str) -> bool {
    text.starts_with("```") || text.starts_with('{') || text.starts_with('"')
}

fn string_field(map: &serde_json::Map<String, Value>, key: &str) -> String {
    match map.get(key) {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

/// Take the list only when every element is a string; anything else is
/// treated as absent.
fn string_list(map: &serde_json::Map<String, Value>, key: &str) -> Vec<String> {
    let Some(Value::Array(items)) = map.get(key) else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::String(s) => out.push(s.clone()),
            _ => return Vec::new(),
        }
    }
    out
}

/// Strip a leading and trailing triple-backtick fence. The opening line may
/// carry a language tag, which is discarded.
fn strip_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let body = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}
