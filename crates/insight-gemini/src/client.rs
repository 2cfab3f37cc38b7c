//! Request plumbing for the Gemini REST API.
//!
//! Wraps `reqwest` with API-key management, typed response deserialization,
//! and error-envelope handling. The base URL is injectable so tests can point
//! the client at a wiremock server.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::GeminiError;
use crate::types::{
    Citation, ErrorEnvelope, GenerateRequest, GenerateResponse, GroundedReply,
};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";

/// Client for the Gemini `generateContent` API.
///
/// Use [`GeminiClient::new`] for production or [`GeminiClient::with_base_url`]
/// to point at a mock server in tests.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: Url,
}

impl GeminiClient {
    /// Creates a new client pointed at the production Gemini API.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, GeminiError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeminiError::Api`] if `base_url` is not a
    /// valid URL.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GeminiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("reddit-insight/0.1 (market-research)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // Url::join appends the model path rather than replacing the last
        // path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let invalid = |e: &dyn std::fmt::Display| GeminiError::Api {
            status: 0,
            message: format!("invalid base URL '{base_url}': {e}"),
        };
        let base = Url::parse(&normalised).map_err(|e| invalid(&e))?;
        let endpoint = base
            .join(&format!("models/{model}:generateContent"))
            .map_err(|e| invalid(&e))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            endpoint,
        })
    }

    /// Issues a search-grounded free-text request.
    ///
    /// The reply carries the generated text plus any citation records from
    /// the grounding metadata. Citations without a URI are dropped.
    ///
    /// # Errors
    ///
    /// - [`GeminiError::Api`] if the API answers with a non-2xx status.
    /// - [`GeminiError::Http`] on network failure.
    /// - [`GeminiError::Deserialize`] if the response body is not valid JSON
    ///   of the expected shape.
    /// - [`GeminiError::EmptyResponse`] if no candidate text came back.
    pub async fn generate_grounded(&self, prompt: &str) -> Result<GroundedReply, GeminiError> {
        let response = self.generate(&GenerateRequest::grounded(prompt)).await?;
        let text = Self::candidate_text(&response)?;

        let citations: Vec<Citation> = response
            .candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
            .map(|meta| {
                meta.grounding_chunks
                    .iter()
                    .filter_map(|chunk| chunk.web.as_ref())
                    .filter_map(|web| {
                        web.uri.as_ref().map(|uri| Citation {
                            uri: uri.clone(),
                            title: web.title.clone(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        tracing::debug!(
            chars = text.len(),
            citations = citations.len(),
            "grounded generation complete"
        );

        Ok(GroundedReply { text, citations })
    }

    /// Issues a JSON-constrained structured-generation request and returns
    /// the raw candidate text.
    ///
    /// The text is *expected* to be a JSON document but is returned verbatim;
    /// tolerant extraction is the caller's concern.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`GeminiClient::generate_grounded`].
    pub async fn generate_json(&self, prompt: &str) -> Result<String, GeminiError> {
        let response = self.generate(&GenerateRequest::json_mode(prompt)).await?;
        Self::candidate_text(&response)
    }

    async fn generate(
        &self,
        request: &GenerateRequest<'_>,
    ) -> Result<GenerateResponse, GeminiError> {
        let url = self.endpoint_url();
        let response = self.client.post(url.clone()).json(request).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| body.clone());
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| GeminiError::Deserialize {
            context: format!("generateContent(model={})", self.model),
            source: e,
        })
    }

    /// Builds `{base}/models/{model}:generateContent?key={api_key}`.
    fn endpoint_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("key", &self.api_key);
        url
    }

    /// Concatenates the text parts of the first candidate.
    fn candidate_text(response: &GenerateResponse) -> Result<String, GeminiError> {
        let text: String = response
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(GeminiError::EmptyResponse);
        }
        Ok(text)
    }
}
