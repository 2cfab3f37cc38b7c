//! Ad-hoc grounded question answering.
//!
//! One grounded request; the summary is the raw reply text and the sources
//! come from citation metadata, never from parsing the prose. No structured
//! extraction, no cache.

use std::collections::HashSet;

use insight_gemini::{Citation, GeminiClient};
use serde::Serialize;

use crate::error::AnalysisError;
use crate::prompts::search_prompt;

/// Maximum number of unique sources returned per answer.
pub const MAX_SOURCES: usize = 5;

const FALLBACK_TITLE: &str = "Source";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchSource {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchAnswer {
    pub summary: String,
    pub sources: Vec<SearchSource>,
}

/// Answers a free-form question from Reddit discussions.
///
/// # Errors
///
/// Returns [`AnalysisError::Upstream`] if the backend call fails.
pub async fn smart_search(
    client: &GeminiClient,
    question: &str,
) -> Result<SearchAnswer, AnalysisError> {
    let reply = client.generate_grounded(&search_prompt(question)).await?;
    let sources = dedupe_sources(reply.citations);

    tracing::debug!(question, sources = sources.len(), "search answer ready");
    Ok(SearchAnswer {
        summary: reply.text,
        sources,
    })
}

/// Deduplicates citations by URL (first occurrence wins, relative order is
/// preserved) and caps the list at [`MAX_SOURCES`] unique entries.
fn dedupe_sources(citations: Vec<Citation>) -> Vec<SearchSource> {
    let mut seen = HashSet::new();
    let mut sources = Vec::new();

    for citation in citations {
        if sources.len() == MAX_SOURCES {
            break;
        }
        if seen.insert(citation.uri.clone()) {
            sources.push(SearchSource {
                title: citation
                    .title
                    .unwrap_or_else(|| FALLBACK_TITLE.to_string()),
                url: citation.uri,
            });
        }
    }

    sources
}
