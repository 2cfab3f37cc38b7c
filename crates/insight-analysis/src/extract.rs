//! Tolerant JSON recovery from raw model text.
//!
//! Model output is not guaranteed to be pure JSON (it may be wrapped in
//! prose or markdown fences), so extraction runs ordered fallbacks from
//! strictest to most permissive. Trying the clean parse first avoids
//! accidentally grabbing a JSON-looking substring out of explanatory prose
//! when the whole reply was already valid.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::AnalysisError;

static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```json\n(.*?)\n```").expect("valid regex"));

static PLAIN_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```\n(.*?)\n```").expect("valid regex"));

/// Recovers a JSON document from `raw`, first success wins:
///
/// 1. direct parse of the whole text;
/// 2. inner content of a ```` ```json ```` fenced block;
/// 3. inner content of an untagged ```` ``` ```` fenced block;
/// 4. the substring from the first `{` to the last `}`, inclusive.
///
/// # Errors
///
/// Returns [`AnalysisError::MalformedResponse`] carrying the original text
/// when every attempt fails.
pub fn extract_json(raw: &str) -> Result<Value, AnalysisError> {
    if let Ok(value) = serde_json::from_str(raw) {
        return Ok(value);
    }

    for fence in [&*JSON_FENCE, &*PLAIN_FENCE] {
        if let Some(captures) = fence.captures(raw) {
            if let Ok(value) = serde_json::from_str(&captures[1]) {
                return Ok(value);
            }
        }
    }

    if let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str(&raw[start..=end]) {
                return Ok(value);
            }
        }
    }

    Err(AnalysisError::MalformedResponse {
        raw: raw.to_string(),
    })
}
