//! Shared domain types and configuration for the Reddit Insight workspace.

pub mod analysis;
pub mod app_config;
pub mod config;
pub mod theme;

use thiserror::Error;

pub use analysis::{
    AnalysisMeta, AnalysisResult, BrandInsight, BrandSentiment, DashboardMetrics, HistoryPoint,
    PainPoint, PainRadarData, RedditPost, Sentiment, SubredditInsight, Topic, UserPersona,
};
pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use theme::Theme;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
