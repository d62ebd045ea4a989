//! Structured-object extraction from free-form model output.
//!
//! Models are asked to embed one JSON object in otherwise free text. The
//! extraction contract is stable and model-facing: locate the first `{` and
//! the last `}`, attempt a parse of that span, and report failure so the
//! caller can substitute a typed default.

/// Extract the first-to-last brace span from `text` and parse it as JSON.
///
/// Returns `None` when no span exists or the span does not parse.
pub fn extract_object(text: &str) -> Option<serde_json::Value> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}
