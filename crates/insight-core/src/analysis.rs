//! Domain types for a synthesized market analysis.
//!
//! Field names are serialized in the camelCase wire format the synthesis
//! backend is prompted to emit; cached entries use the same shape, so a
//! cached payload round-trips without translation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post-level sentiment label as emitted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// A representative Reddit post included in topic/subreddit/brand samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedditPost {
    pub title: String,
    pub url: String,
    pub snippet: String,
    /// Chinese-language summary of the post.
    pub summary_cn: String,
    pub subreddit: String,
    pub upvotes: u64,
    pub comments: u64,
    pub date: String,
    pub sentiment: Sentiment,
}

/// One point in a 12-month trend series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub month: String,
    pub value: f64,
}

/// Archetypal user profile attached to a topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPersona {
    #[serde(rename = "type")]
    pub persona_type: String,
    pub motivation: String,
    pub complaints: String,
    pub scenario: String,
    pub severity: String,
    pub tone: String,
}

/// One axis of a subreddit's pain-profile radar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PainRadarData {
    pub subject: String,
    #[serde(rename = "A")]
    pub value: f64,
    #[serde(rename = "fullMark")]
    pub full_mark: f64,
}

/// A scored pain point.
///
/// The four sub-scores are each on a 0–25 scale and `total_score` on 0–100.
/// `total_score` is taken verbatim from the backend; it is never recomputed
/// or validated against the sub-scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PainPoint {
    pub id: String,
    pub title: String,
    pub severity: f64,
    pub frequency: f64,
    pub recency: f64,
    pub unmet_need: f64,
    pub total_score: f64,
    #[serde(default)]
    pub quotes: Vec<String>,
}

/// A discussion topic with its trend series and optional drill-downs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub title: String,
    /// Growth percentage over the sampled window.
    pub growth: f64,
    pub volume: u64,
    /// Sentiment score, 0–100.
    pub sentiment: f64,
    #[serde(default)]
    pub history: Vec<HistoryPoint>,
    #[serde(default)]
    pub pain_points: Option<Vec<PainPoint>>,
    #[serde(default)]
    pub brands: Option<Vec<String>>,
    #[serde(default)]
    pub user_persona: Option<UserPersona>,
    #[serde(default)]
    pub top_posts: Option<Vec<RedditPost>>,
}

/// Positive/neutral/negative share for a brand.
///
/// Expected (but not enforced) to sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandSentiment {
    pub pos: f64,
    pub neu: f64,
    pub neg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandInsight {
    pub name: String,
    pub mentions: u64,
    pub yoy_growth: f64,
    pub sentiment: BrandSentiment,
    #[serde(default)]
    pub top_complaints: Vec<String>,
    #[serde(default)]
    pub top_praises: Vec<String>,
    #[serde(default)]
    pub example_posts: Vec<RedditPost>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubredditInsight {
    /// Display name, e.g. `r/Parenting`.
    pub name: String,
    pub member_count: u64,
    /// Posts attributed to this subreddit out of the sampled set.
    pub post_volume: u64,
    /// Share of the sampled posts, as a percentage.
    pub percentage: f64,
    #[serde(default)]
    pub history: Vec<HistoryPoint>,
    #[serde(default)]
    pub top_topics: Vec<String>,
    #[serde(default)]
    pub brands: Vec<String>,
    #[serde(default)]
    pub pain_points: Vec<PainRadarData>,
    #[serde(default)]
    pub top_posts: Vec<RedditPost>,
}

/// Aggregate KPIs for the dashboard header cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_posts_growth: f64,
    pub total_posts_volume: u64,
    pub active_trends: u64,
    pub engagement_rate: f64,
    pub active_users: u64,
}

/// Provenance metadata for one analysis.
///
/// `last_updated` is stamped by the orchestrator when the result is
/// finalized; the backend never supplies it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMeta {
    pub fetched_post_count: u64,
    pub fetch_mode: String,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

/// The unit of cached value: one complete synthesized analysis for a query.
///
/// `metrics` is deliberately non-defaulted: a persisted entry that lacks it
/// fails deserialization and is treated as corrupt by the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub meta: AnalysisMeta,
    pub metrics: DashboardMetrics,
    #[serde(default)]
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub subreddits: Vec<SubredditInsight>,
    #[serde(default)]
    pub brands: Vec<BrandInsight>,
    #[serde(default)]
    pub pain_points: Vec<PainPoint>,
}
