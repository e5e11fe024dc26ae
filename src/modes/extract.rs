//! Recovery of a JSON object embedded in free-text model replies.

use serde_json::Value;
use tracing::debug;

use crate::error::ExtractionError;

/// Recover the first JSON object embedded in a reply.
///
/// Candidates are tried in order of their opening brace. Each candidate runs to
/// its balanced closing brace, with braces inside string literals ignored; the
/// first candidate that parses as an object wins. When none does, the first
/// parse error is reported, or `NoObject` if no span ever balanced. No schema
/// is checked: extra and missing keys pass through unchanged.
pub fn extract_structured(reply: &str) -> Result<Value, ExtractionError> {
    let mut first_error: Option<String> = None;

    for (start, _) in reply.match_indices('{') {
        let Some(len) = balanced_object_len(&reply[start..]) else {
            continue;
        };
        match serde_json::from_str::<Value>(&reply[start..start + len]) {
            Ok(value) if value.is_object() => return Ok(value),
            Ok(_) => {}
            Err(e) => {
                debug!(offset = start, error = %e, "Skipping unparseable brace span");
                first_error.get_or_insert_with(|| e.to_string());
            }
        }
    }

    Err(match first_error {
        Some(message) => ExtractionError::Malformed { message },
        None => ExtractionError::NoObject,
    })
}

/// Byte length of the balanced `{...}` span at the start of `text`.
///
/// Returns `None` when the braces never balance.
fn balanced_object_len(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (index, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(index + ch.len_utf8());
                }
            }
            _ => {}
        }
    }

    None
}
