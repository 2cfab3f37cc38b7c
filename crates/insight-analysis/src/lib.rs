//! Analysis engine for Reddit Insight.
//!
//! Wraps the Gemini backend with the query-cache-and-normalization layer:
//! normalizes query text into stable cache keys, recovers JSON documents from
//! loosely formatted model replies, caches successful analyses through the
//! storage port, and orchestrates the two-stage grounding + synthesis request
//! flow. Also hosts the uncached keyword-suggestion and ad-hoc search
//! services and the theme watchlist.

pub mod cache;
pub mod error;
pub mod extract;
pub mod key;
pub mod keywords;
pub mod pipeline;
pub mod prompts;
pub mod search;
pub mod themes;

pub use cache::AnalysisCache;
pub use error::AnalysisError;
pub use extract::extract_json;
pub use key::cache_key;
pub use keywords::suggest_keywords;
pub use pipeline::Analyzer;
pub use search::{smart_search, SearchAnswer, SearchSource};
pub use themes::ThemeManager;
