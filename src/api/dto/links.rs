//! DTOs for the administrative link listing endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::ShortLink;

/// Response body for `GET /api/urls`.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub total: usize,
    pub links: Vec<LinkSummary>,
}

/// A single link in the listing.
#[derive(Debug, Serialize)]
pub struct LinkSummary {
    pub short_id: String,
    pub long_url: String,
    pub hits: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl From<ShortLink> for LinkSummary {
    fn from(link: ShortLink) -> Self {
        Self {
            short_id: link.short_id,
            long_url: link.long_url,
            hits: link.hits,
            created_by: link.created_by,
            created_at: link.created_at,
        }
    }
}
