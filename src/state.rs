//! Shared application state injected into all handlers.

use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::{RedirectService, ShortenerService};
use crate::domain::hit_event::HitEvent;
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::cache::LinkCache;
use crate::infrastructure::tracking::HitTracker;

/// Process-wide shared resources and workflow services.
///
/// Everything here is cheaply cloneable (`Arc`s and a channel sender);
/// components are constructed once at startup and passed by reference,
/// never looked up as globals.
#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<ShortenerService>,
    pub redirects: Arc<RedirectService>,
    pub cache: Arc<dyn LinkCache>,
    pub tracker: Arc<dyn HitTracker>,
    pub hit_tx: mpsc::Sender<HitEvent>,
    pub db: Arc<PgPool>,
    pub base_url: String,
}

impl AppState {
    pub fn new(
        db: Arc<PgPool>,
        links: Arc<dyn LinkRepository>,
        cache: Arc<dyn LinkCache>,
        tracker: Arc<dyn HitTracker>,
        hit_tx: mpsc::Sender<HitEvent>,
        base_url: String,
    ) -> Self {
        let shortener = Arc::new(ShortenerService::new(links.clone(), cache.clone()));
        let redirects = Arc::new(RedirectService::new(
            links,
            cache.clone(),
            tracker.clone(),
            hit_tx.clone(),
        ));

        Self {
            shortener,
            redirects,
            cache,
            tracker,
            hit_tx,
            db,
            base_url,
        }
    }

    /// Builds the public short URL for an identifier.
    pub fn short_url(&self, short_id: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), short_id)
    }
}
