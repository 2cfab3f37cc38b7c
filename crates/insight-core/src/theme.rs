use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user-managed watchlist entry.
///
/// Themes are persisted independently of the analysis cache and reference it
/// only by query text (the theme name or one of its keywords).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub id: Uuid,
    pub name: String,
    pub keywords: Vec<String>,
    pub is_active: bool,
    #[serde(default)]
    pub last_analyzed: Option<DateTime<Utc>>,
}

impl Theme {
    /// Creates an active theme with a fresh id and no analysis marker.
    #[must_use]
    pub fn new(name: impl Into<String>, keywords: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            keywords,
            is_active: true,
            last_analyzed: None,
        }
    }
}
