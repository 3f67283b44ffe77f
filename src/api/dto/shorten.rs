//! DTOs for the shorten endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::ShortLink;

/// Request body for `POST /api/shorten`.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[validate(url(message = "Invalid URL format"))]
    #[validate(length(max = 2048, message = "URL exceeds maximum length"))]
    pub long_url: String,
}

/// Response body for a shortened link.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub short_id: String,
    pub short_url: String,
    pub long_url: String,
    pub hits: i64,
    pub created_at: DateTime<Utc>,
}

impl ShortenResponse {
    pub fn from_link(link: ShortLink, short_url: String) -> Self {
        Self {
            short_id: link.short_id,
            short_url,
            long_url: link.long_url,
            hits: link.hits,
            created_at: link.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_request_passes_validation() {
        let req = ShortenRequest {
            long_url: "https://example.com/some/path?q=1".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_malformed_url_fails_validation() {
        let req = ShortenRequest {
            long_url: "not a url".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_oversized_url_fails_validation() {
        let req = ShortenRequest {
            long_url: format!("https://example.com/{}", "a".repeat(2100)),
        };
        assert!(req.validate().is_err());
    }
}
