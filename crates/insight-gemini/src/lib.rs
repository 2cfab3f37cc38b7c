//! HTTP client for the Gemini `generateContent` REST API.
//!
//! Exposes the two call shapes the analysis engine needs: a search-grounded
//! free-text request that carries citation metadata, and a JSON-constrained
//! structured-generation request. No retries, no streaming.

mod client;
mod error;
mod types;

pub use client::GeminiClient;
pub use error::GeminiError;
pub use types::{Citation, GroundedReply};
