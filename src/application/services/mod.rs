mod redirect_service;
mod shortener_service;

pub use redirect_service::RedirectService;
pub use shortener_service::{ShortenOutcome, ShortenerService};
