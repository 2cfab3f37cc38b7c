//! Cache-key derivation from free-form query text.

/// Namespace prefix for persisted analysis entries, so they cannot collide
/// with unrelated data (e.g. the theme watchlist) in the same store.
pub const KEY_NAMESPACE: &str = "reddit_insight_";

/// Derives the stable cache key for a query: trim, lowercase, prefix.
///
/// Queries differing only in edge whitespace or capitalization collapse to
/// one key; no stemming or synonym folding is attempted. Input already
/// carrying the namespace prefix is not re-prefixed, so the function is
/// idempotent.
#[must_use]
pub fn cache_key(query: &str) -> String {
    let folded = query.trim().to_lowercase();
    if folded.starts_with(KEY_NAMESPACE) {
        folded
    } else {
        format!("{KEY_NAMESPACE}{folded}")
    }
}
