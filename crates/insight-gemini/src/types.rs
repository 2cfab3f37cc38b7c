//! Wire types for the `generateContent` endpoint.

use serde::{Deserialize, Serialize};

// ---- request ----

#[derive(Debug, Serialize)]
pub(crate) struct GenerateRequest<'a> {
    pub contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl<'a> GenerateRequest<'a> {
    pub(crate) fn grounded(prompt: &'a str) -> Self {
        Self {
            contents: vec![Content::user(prompt)],
            tools: Some(vec![Tool {
                google_search: GoogleSearch {},
            }]),
            generation_config: None,
        }
    }

    pub(crate) fn json_mode(prompt: &'a str) -> Self {
        Self {
            contents: vec![Content::user(prompt)],
            tools: None,
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json",
            }),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct Content<'a> {
    pub parts: Vec<Part<'a>>,
}

impl<'a> Content<'a> {
    fn user(text: &'a str) -> Self {
        Self {
            parts: vec![Part { text }],
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct Part<'a> {
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct Tool {
    pub google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
pub(crate) struct GoogleSearch {}

#[derive(Debug, Serialize)]
pub(crate) struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    pub response_mime_type: &'static str,
}

// ---- response ----

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GroundingChunk {
    #[serde(default)]
    pub web: Option<WebSource>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WebSource {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Error envelope used by the API for non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: String,
}

// ---- public result types ----

/// One citation record attached to a grounded reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub uri: String,
    /// Page title as reported by the search tool; may be absent.
    pub title: Option<String>,
}

/// Text plus citation metadata from a search-grounded request.
#[derive(Debug, Clone)]
pub struct GroundedReply {
    pub text: String,
    pub citations: Vec<Citation>,
}
