//! DTOs for the popular links endpoint.

use serde::{Deserialize, Serialize};

use crate::infrastructure::tracking::PopularEntry;

/// Query parameters for `GET /api/popular`.
#[derive(Debug, Deserialize)]
pub struct PopularQuery {
    pub limit: Option<usize>,
}

/// Response body: recently popular links, highest approximate count first.
#[derive(Debug, Serialize)]
pub struct PopularResponse {
    pub entries: Vec<PopularEntry>,
}
