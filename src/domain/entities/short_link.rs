//! Short link entity mapping an identifier to its long URL.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A shortened URL record.
///
/// The database row in `short_links` is the canonical copy; the cache holds
/// a time-boxed serialized mirror of this struct. A cached copy may carry a
/// stale `hits` value, which is informational only — the durable counter is
/// the authoritative one and is only ever changed through
/// [`crate::domain::repositories::LinkRepository::increment_hits`].
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ShortLink {
    pub id: i64,
    pub short_id: String,
    pub long_url: String,
    pub hits: i64,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Modeled for future expiry support; not enforced anywhere yet.
    /// Enforcement would live in the redirect workflow's store lookup.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Input data for creating a new short link.
#[derive(Debug, Clone)]
pub struct NewShortLink {
    pub short_id: String,
    pub long_url: String,
    /// Opaque creator identity recorded at creation, e.g. the client IP.
    pub created_by: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_link() -> ShortLink {
        ShortLink {
            id: 1,
            short_id: "aB3xY9z".to_string(),
            long_url: "https://example.com/a/b/c".to_string(),
            hits: 0,
            created_by: Some("203.0.113.7".to_string()),
            created_at: Utc::now(),
            expires_at: None,
        }
    }

    #[test]
    fn test_cache_round_trip_preserves_fields() {
        let link = sample_link();
        let json = serde_json::to_string(&link).unwrap();
        let restored: ShortLink = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.short_id, link.short_id);
        assert_eq!(restored.long_url, link.long_url);
        assert_eq!(restored.hits, link.hits);
        assert_eq!(restored.created_by, link.created_by);
    }
}
