use insight_gemini::GeminiError;
use insight_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The backend call itself failed (network, auth, quota, service fault).
    #[error("upstream model error: {0}")]
    Upstream(#[from] GeminiError),

    /// The backend responded, but no JSON document of the expected shape
    /// could be recovered after exhausting the extraction fallbacks. Carries
    /// the raw reply for diagnostics.
    #[error("could not extract a structured document from the model response")]
    MalformedResponse { raw: String },

    /// A watchlist read or write failed. The analysis cache never raises
    /// this; it absorbs storage failures internally.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}
