//! Analysis orchestration.
//!
//! `analyze` runs a linear state machine: cache check (unless forced),
//! grounding request, synthesis request, extraction, finalize. A failure at
//! any stage aborts the whole operation (no retries, no partial results)
//! and leaves the prior cache entry untouched.

use chrono::Utc;
use insight_core::AnalysisResult;
use insight_gemini::GeminiClient;
use insight_store::StoragePort;

use crate::cache::AnalysisCache;
use crate::error::AnalysisError;
use crate::extract::extract_json;
use crate::prompts::{
    grounding_prompt, synthesis_prompt, MAX_BRANDS, MAX_EXAMPLE_POSTS_PER_BRAND,
    MAX_PAIN_POINTS_PER_TOPIC, MAX_POSTS_PER_TOPIC, MAX_SUBREDDITS, MAX_TOPICS,
};

pub struct Analyzer<S> {
    client: GeminiClient,
    cache: AnalysisCache<S>,
}

impl<S: StoragePort> Analyzer<S> {
    pub fn new(client: GeminiClient, store: S) -> Self {
        Self {
            client,
            cache: AnalysisCache::new(store),
        }
    }

    /// Read access to the underlying cache, for callers that only want the
    /// last persisted result without triggering upstream requests.
    pub fn cache(&self) -> &AnalysisCache<S> {
        &self.cache
    }

    /// Produces the analysis for `query`.
    ///
    /// A cache hit returns immediately with no upstream calls unless
    /// `force_refresh` is set, in which case the full grounding + synthesis
    /// sequence runs and its result overwrites the cached entry. The
    /// `meta.last_updated` stamp is set here at finalize; whatever the model
    /// emitted for it is discarded.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::Upstream`] if a backend call fails.
    /// - [`AnalysisError::MalformedResponse`] if no schema-shaped document
    ///   could be recovered from the synthesis reply. Nothing is cached.
    pub async fn analyze(
        &self,
        query: &str,
        force_refresh: bool,
    ) -> Result<AnalysisResult, AnalysisError> {
        if !force_refresh {
            if let Some(cached) = self.cache.get(query) {
                return Ok(cached);
            }
        }

        tracing::info!(query, force_refresh, "running grounding search");
        let grounding = self.client.generate_grounded(&grounding_prompt(query)).await?;

        tracing::info!(query, context_chars = grounding.text.len(), "running synthesis");
        let raw = self
            .client
            .generate_json(&synthesis_prompt(query, &grounding.text))
            .await?;

        let document = extract_json(&raw)?;
        let mut result: AnalysisResult =
            serde_json::from_value(document).map_err(|e| {
                tracing::warn!(query, error = %e, "synthesis document does not match schema");
                AnalysisError::MalformedResponse { raw }
            })?;

        enforce_caps(&mut result);
        result.meta.last_updated = Some(Utc::now());
        self.cache.put(query, &result);

        tracing::info!(
            query,
            topics = result.topics.len(),
            subreddits = result.subreddits.len(),
            brands = result.brands.len(),
            "analysis complete"
        );
        Ok(result)
    }
}

/// Clamps list lengths to the requested caps. The synthesis prompt asks for
/// these limits, but the backend is not trusted to comply.
fn enforce_caps(result: &mut AnalysisResult) {
    result.topics.truncate(MAX_TOPICS);
    result.subreddits.truncate(MAX_SUBREDDITS);
    result.brands.truncate(MAX_BRANDS);

    for topic in &mut result.topics {
        if let Some(points) = topic.pain_points.as_mut() {
            points.truncate(MAX_PAIN_POINTS_PER_TOPIC);
        }
        if let Some(posts) = topic.top_posts.as_mut() {
            posts.truncate(MAX_POSTS_PER_TOPIC);
        }
    }
    for brand in &mut result.brands {
        brand.example_posts.truncate(MAX_EXAMPLE_POSTS_PER_BRAND);
    }
}
