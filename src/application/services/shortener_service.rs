//! Shortening workflow: dedup, id generation, persist, cache.

use std::sync::Arc;

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::LinkCache;
use crate::utils::short_id::generate_short_id;
use serde_json::json;
use tracing::{debug, warn};

/// Unique constraint on `short_links.short_id` (see migrations).
pub const SHORT_ID_CONSTRAINT: &str = "short_links_short_id_key";

/// Unique constraint on `short_links.long_url` (see migrations).
pub const LONG_URL_CONSTRAINT: &str = "short_links_long_url_key";

/// Attempts before id generation gives up.
const MAX_GENERATE_ATTEMPTS: usize = 10;

/// Result of a shortening request.
///
/// Shortening is idempotent on the long URL: submitting an already-known
/// URL returns the existing record untouched, with its hit count intact.
#[derive(Debug)]
pub enum ShortenOutcome {
    Created(ShortLink),
    Existing(ShortLink),
}

impl ShortenOutcome {
    pub fn link(&self) -> &ShortLink {
        match self {
            Self::Created(link) | Self::Existing(link) => link,
        }
    }

    pub fn into_link(self) -> ShortLink {
        match self {
            Self::Created(link) | Self::Existing(link) => link,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Turns long URLs into persisted short link records.
///
/// Expects input that has already been through
/// [`crate::utils::url_sanitizer::sanitize_url`]; the workflow itself does
/// no validation.
pub struct ShortenerService {
    links: Arc<dyn LinkRepository>,
    cache: Arc<dyn LinkCache>,
}

impl ShortenerService {
    pub fn new(links: Arc<dyn LinkRepository>, cache: Arc<dyn LinkCache>) -> Self {
        Self { links, cache }
    }

    /// Shortens a URL, reusing the existing record when one exists.
    ///
    /// # Flow
    ///
    /// 1. Deduplicate by exact `long_url`
    /// 2. Generate a unique short id (bounded collision-checked loop)
    /// 3. Insert; a `short_id` unique violation means another request won
    ///    the same id in between, so regenerate and retry the insert once;
    ///    a `long_url` violation means the dedup check raced, so return
    ///    the record the concurrent request created
    /// 4. Push the fresh record into the cache, best-effort
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] when no unique id can be found within
    /// the attempt bound. Cache failures are logged and never surfaced.
    pub async fn shorten(
        &self,
        long_url: String,
        created_by: Option<String>,
    ) -> Result<ShortenOutcome, AppError> {
        if let Some(existing) = self.links.find_by_long_url(&long_url).await? {
            debug!("Reusing existing short link {} for URL", existing.short_id);
            return Ok(ShortenOutcome::Existing(existing));
        }

        let short_id = self.generate_unique_short_id().await?;

        let link = match self
            .links
            .insert(NewShortLink {
                short_id,
                long_url: long_url.clone(),
                created_by: created_by.clone(),
            })
            .await
        {
            Ok(link) => link,
            Err(e) => match e.conflict_constraint() {
                Some(LONG_URL_CONSTRAINT) => {
                    // Lost the dedup race: a concurrent request inserted the
                    // same URL after our check. Its record is the canonical one.
                    return self
                        .links
                        .find_by_long_url(&long_url)
                        .await?
                        .map(ShortenOutcome::Existing)
                        .ok_or_else(|| {
                            AppError::internal(
                                "Duplicate URL reported but record not found",
                                json!({}),
                            )
                        });
                }
                Some(SHORT_ID_CONSTRAINT) => {
                    let retry_id = self.generate_unique_short_id().await?;
                    self.links
                        .insert(NewShortLink {
                            short_id: retry_id,
                            long_url,
                            created_by,
                        })
                        .await?
                }
                _ => return Err(e),
            },
        };

        self.populate_cache(&link).await;

        Ok(ShortenOutcome::Created(link))
    }

    /// Administrative listing, newest first.
    pub async fn list_links(&self) -> Result<Vec<ShortLink>, AppError> {
        self.links.list_all().await
    }

    /// Generates a short id not currently present in the durable store.
    ///
    /// The existence check shrinks the collision window but cannot close
    /// it; the schema's unique constraint is the real guarantee.
    async fn generate_unique_short_id(&self) -> Result<String, AppError> {
        for _ in 0..MAX_GENERATE_ATTEMPTS {
            let candidate = generate_short_id();

            if self.links.find_by_short_id(&candidate).await?.is_none() {
                return Ok(candidate);
            }
        }

        Err(AppError::internal(
            "Failed to generate a unique short id",
            json!({ "attempts": MAX_GENERATE_ATTEMPTS }),
        ))
    }

    /// Write-around cache population after insert. Failure is logged and
    /// absorbed: the next redirect will simply read through to the store.
    async fn populate_cache(&self, link: &ShortLink) {
        if let Err(e) = self.cache.put(&link.short_id, link, None).await {
            warn!("Failed to cache new link {}: {}", link.short_id, e);
        }
    }
}
