//! Long URL validation and sanitization.
//!
//! Every URL entering the shortening workflow passes through
//! [`sanitize_url`] first. The workflows themselves trust their input, so
//! this is the single place where scheme, host, and content rules are
//! enforced.

use std::net::{Ipv4Addr, Ipv6Addr};
use url::{Host, Url};

/// Rejection reasons for a candidate long URL.
#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS URLs are allowed")]
    UnsupportedScheme,

    #[error("URL host is not allowed")]
    DeniedHost,
}

/// Validates and sanitizes a long URL.
///
/// # Rules
///
/// 1. Leading/trailing whitespace and ASCII control characters are stripped
/// 2. The result must parse as an absolute URL
/// 3. Scheme must be `http` or `https` (rejects `javascript:`, `data:`, ...)
/// 4. Loopback and unspecified hosts are denied (`localhost`, `127.0.0.1`,
///    `0.0.0.0`, `::1`) so the service cannot be used to mask links into
///    its own network
///
/// Returns the normalized serialization produced by the `url` crate.
pub fn sanitize_url(input: &str) -> Result<String, UrlValidationError> {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| !c.is_ascii_control())
        .collect();

    let url =
        Url::parse(&cleaned).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedScheme),
    }

    match url.host() {
        Some(Host::Domain(domain)) if domain.eq_ignore_ascii_case("localhost") => {
            return Err(UrlValidationError::DeniedHost);
        }
        Some(Host::Ipv4(addr)) if addr == Ipv4Addr::LOCALHOST || addr == Ipv4Addr::UNSPECIFIED => {
            return Err(UrlValidationError::DeniedHost);
        }
        Some(Host::Ipv6(addr)) if addr == Ipv6Addr::LOCALHOST || addr == Ipv6Addr::UNSPECIFIED => {
            return Err(UrlValidationError::DeniedHost);
        }
        Some(_) => {}
        None => return Err(UrlValidationError::InvalidFormat("missing host".to_string())),
    }

    Ok(url.to_string())
}
