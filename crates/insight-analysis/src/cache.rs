//! Persistent analysis cache over the storage port.
//!
//! One whole-entry record per normalized query. Corrupt entries are evicted
//! on read so the same bytes are never re-parsed on the next lookup, and
//! write failures never fail the analysis that produced the value; the
//! caller already holds the fresh result in memory.

use insight_core::AnalysisResult;
use insight_store::StoragePort;

use crate::key::cache_key;

pub struct AnalysisCache<S> {
    store: S,
}

impl<S: StoragePort> AnalysisCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Looks up the last successful analysis for `query`.
    ///
    /// Returns `None` on a miss, on a storage failure (logged, treated as a
    /// miss), or on a corrupt entry (logged and deleted). Never surfaces an
    /// error: cache corruption is absorbed here.
    pub fn get(&self, query: &str) -> Option<AnalysisResult> {
        let key = cache_key(query);

        let raw = match self.store.read(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(query, error = %e, "cache read failed; treating as miss");
                return None;
            }
        };

        // A payload missing the metrics block fails deserialization and is
        // treated as corrupt.
        match serde_json::from_str::<AnalysisResult>(&raw) {
            Ok(result) => {
                tracing::info!(query, "loaded cached analysis");
                Some(result)
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "corrupt cache entry; evicting");
                if let Err(e) = self.store.delete(&key) {
                    tracing::warn!(query, error = %e, "failed to evict corrupt cache entry");
                }
                None
            }
        }
    }

    /// Writes `result` for `query`, replacing any prior entry.
    ///
    /// Best-effort: serialization or storage failures are logged and
    /// swallowed.
    pub fn put(&self, query: &str, result: &AnalysisResult) {
        let key = cache_key(query);
        match serde_json::to_string(result) {
            Ok(serialized) => {
                if let Err(e) = self.store.write(&key, &serialized) {
                    tracing::warn!(query, error = %e, "cache write failed; result not persisted");
                }
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "cache serialization failed; result not persisted");
            }
        }
    }
}
