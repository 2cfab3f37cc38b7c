//! Theme watchlist persistence.
//!
//! The whole list is stored as one JSON document under a fixed key, separate
//! from the analysis-cache namespace. Unlike the cache, storage failures here
//! surface to the caller; silently losing the user's watchlist is not
//! acceptable.

use chrono::Utc;
use insight_core::Theme;
use insight_store::StoragePort;
use uuid::Uuid;

use crate::error::AnalysisError;

/// Storage key for the serialized watchlist. Hyphenated, so it can never
/// collide with the underscore-prefixed analysis-cache namespace.
pub const THEMES_KEY: &str = "reddit-insight-themes";

pub struct ThemeManager<S> {
    store: S,
}

impl<S: StoragePort> ThemeManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns all themes. A missing entry is an empty list; a corrupt entry
    /// is evicted (logged) and also treated as empty.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Store`] if the store read fails.
    pub fn list(&self) -> Result<Vec<Theme>, AnalysisError> {
        let Some(raw) = self.store.read(THEMES_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(themes) => Ok(themes),
            Err(e) => {
                tracing::warn!(error = %e, "corrupt theme list; evicting");
                self.store.delete(THEMES_KEY)?;
                Ok(Vec::new())
            }
        }
    }

    /// Creates and persists a new active theme. Callers obtain `keywords`
    /// from the keyword-suggestion service beforehand.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Store`] if persisting fails.
    pub fn add(&self, name: &str, keywords: Vec<String>) -> Result<Theme, AnalysisError> {
        let theme = Theme::new(name, keywords);
        let mut themes = self.list()?;
        themes.push(theme.clone());
        self.save(&themes)?;
        tracing::info!(theme = name, id = %theme.id, "theme added");
        Ok(theme)
    }

    /// Flips the active flag for `id`. Returns `false` if no theme matched.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Store`] if persisting fails.
    pub fn toggle(&self, id: Uuid) -> Result<bool, AnalysisError> {
        self.update(id, |theme| theme.is_active = !theme.is_active)
    }

    /// Stamps the last-analyzed marker for `id` with the current time.
    /// Returns `false` if no theme matched.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Store`] if persisting fails.
    pub fn mark_analyzed(&self, id: Uuid) -> Result<bool, AnalysisError> {
        self.update(id, |theme| theme.last_analyzed = Some(Utc::now()))
    }

    /// Deletes the theme with `id`. Returns `false` if no theme matched.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Store`] if persisting fails.
    pub fn remove(&self, id: Uuid) -> Result<bool, AnalysisError> {
        let mut themes = self.list()?;
        let before = themes.len();
        themes.retain(|theme| theme.id != id);
        if themes.len() == before {
            return Ok(false);
        }
        self.save(&themes)?;
        Ok(true)
    }

    fn update(
        &self,
        id: Uuid,
        mutate: impl FnOnce(&mut Theme),
    ) -> Result<bool, AnalysisError> {
        let mut themes = self.list()?;
        let Some(theme) = themes.iter_mut().find(|theme| theme.id == id) else {
            return Ok(false);
        };
        mutate(theme);
        self.save(&themes)?;
        Ok(true)
    }

    fn save(&self, themes: &[Theme]) -> Result<(), AnalysisError> {
        // A Vec<Theme> always serializes.
        let serialized =
            serde_json::to_string(themes).expect("theme list serializes");
        self.store.write(THEMES_KEY, &serialized)?;
        Ok(())
    }
}
