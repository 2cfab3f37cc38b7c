//! Keyword suggestion service.
//!
//! Single JSON-constrained request, no cache, no grounding stage. The
//! backend is asked for a plain string array; extraction reuses the same
//! staged fallbacks as the analysis path.

use insight_gemini::GeminiClient;

use crate::error::AnalysisError;
use crate::extract::extract_json;
use crate::prompts::keyword_prompt;

/// Suggests 5–8 related keywords for a research theme.
///
/// # Errors
///
/// - [`AnalysisError::Upstream`] if the backend call fails.
/// - [`AnalysisError::MalformedResponse`] if no string array could be
///   recovered from the reply.
pub async fn suggest_keywords(
    client: &GeminiClient,
    theme: &str,
) -> Result<Vec<String>, AnalysisError> {
    let raw = client.generate_json(&keyword_prompt(theme)).await?;
    let document = extract_json(&raw)?;
    let keywords: Vec<String> = serde_json::from_value(document)
        .map_err(|_| AnalysisError::MalformedResponse { raw })?;

    tracing::debug!(theme, count = keywords.len(), "keyword suggestions ready");
    Ok(keywords)
}
