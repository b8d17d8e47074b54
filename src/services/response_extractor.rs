use serde_json::Value;

use crate::services::chat_service::MessageContent;
use crate::services::regeneration_service::RegenerationError;

const EXCERPT_LEN: usize = 160;

/// Flatten an assistant message's content into plain text. Part lists keep
/// only parts tagged "text"; unrecognized shapes are stringified so the
/// caller always receives something, even if it fails to parse downstream.
pub fn extract_text(content: &MessageContent) -> String {
    match content {
        MessageContent::PlainText(text) => text.clone(),
        MessageContent::PartList(parts) => parts
            .iter()
            .filter(|part| part.kind == "text")
            .map(|part| part.text.as_str())
            .collect(),
        MessageContent::TextWrapper { text } => text.clone(),
        MessageContent::Unknown(value) => value.to_string(),
    }
}

/// Locate the JSON object the model (usually) wraps in prose, by scanning
/// from the first `{` to the last `}`.
///
/// Known limitation: a reply containing two independent JSON objects, or
/// brace characters inside string literals, will mis-parse. That matches the
/// behavior the rest of the pipeline expects; do not swap in a stricter
/// tokenizer.
pub fn extract_json_object(text: &str) -> Result<Value, RegenerationError> {
    let start = text.find('{').ok_or_else(|| {
        RegenerationError::Extraction(format!("no JSON object in reply: {}", excerpt(text)))
    })?;

    let end = text.rfind('}').filter(|end| *end > start).ok_or_else(|| {
        RegenerationError::Extraction(format!("unterminated JSON object in reply: {}", excerpt(text)))
    })?;

    serde_json::from_str(&text[start..=end]).map_err(|e| {
        RegenerationError::Extraction(format!("reply is not valid JSON ({}): {}", e, excerpt(text)))
    })
}

// Diagnostics carry a bounded slice of the raw reply, never the full text.
fn excerpt(text: &str) -> String {
    if text.chars().count() <= EXCERPT_LEN {
        text.to_string()
    } else {
        let head: String = text.chars().take(EXCERPT_LEN).collect();
        format!("{}...", head)
    }
}
