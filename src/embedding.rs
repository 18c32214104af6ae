//! Embedding text derivation.

use crate::normalize::SummaryRecord;

/// Flatten a summary record into one string suitable for embedding
/// generation.
///
/// Sections are newline-joined and omitted when empty. `quality` is a
/// generation diagnostic, not content, and is left out.
pub fn build_embedding_text(record: &SummaryRecord) -> String {
    let mut sections: Vec<String> = Vec::new();

    if !record.summary.is_empty() {
        sections.push(record.summary.clone());
    }
    if !record.objects.is_empty() {
        sections.push(format!("Objects: {}", record.objects.join(", ")));
    }
    if !record.actions.is_empty() {
        sections.push(format!("Actions: {}", record.actions.join(", ")));
    }
    if !record.setting.is_empty() {
        sections.push(format!("Setting: {}", record.setting));
    }
    if !record.ocr.is_empty() {
        sections.push(format!("Text: {}", record.ocr));
    }

    sections.join("\n")
}
