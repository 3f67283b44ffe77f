//! Short identifier generation.
//!
//! Identifiers are 7 characters drawn from the 62-character alphanumeric
//! alphabet, giving a 62^7 key space. Generation is random rather than
//! sequential, so uniqueness is probabilistic and must be checked against
//! the durable store by the caller; [`crate::application::services::ShortenerService`]
//! does this with a bounded retry loop.

use rand::{distr::Alphanumeric, Rng};

/// Length of generated short identifiers.
pub const SHORT_ID_LEN: usize = 7;

/// Generates a random short identifier from `[A-Za-z0-9]`.
///
/// Uses the thread-local CSPRNG, so identifiers are not guessable from
/// previous outputs. Collisions are possible and must be handled by the
/// caller.
pub fn generate_short_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SHORT_ID_LEN)
        .map(char::from)
        .collect()
}

/// Returns true if `candidate` has the exact shape of a generated short id.
///
/// Used by the redirect handler to reject malformed path segments without
/// touching the cache or the database.
pub fn is_valid_short_id(candidate: &str) -> bool {
    candidate.len() == SHORT_ID_LEN && candidate.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_id_has_fixed_length() {
        assert_eq!(generate_short_id().len(), SHORT_ID_LEN);
    }

    #[test]
    fn test_generated_id_is_alphanumeric() {
        let id = generate_short_id();
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let mut seen = HashSet::new();

        for _ in 0..1000 {
            seen.insert(generate_short_id());
        }

        assert_eq!(seen.len(), 1000);
    }

    #[test]
    fn test_generated_id_passes_validation() {
        assert!(is_valid_short_id(&generate_short_id()));
    }

    #[test]
    fn test_validation_rejects_wrong_length() {
        assert!(!is_valid_short_id(""));
        assert!(!is_valid_short_id("abc12"));
        assert!(!is_valid_short_id("abc12345"));
    }

    #[test]
    fn test_validation_rejects_non_alphanumeric() {
        assert!(!is_valid_short_id("abc-123"));
        assert!(!is_valid_short_id("abc_123"));
        assert!(!is_valid_short_id("abc 123"));
    }
}
