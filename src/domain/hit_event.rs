//! Hit event passed from the redirect path to the background counter worker.

/// A single resolved redirect, queued for a durable hit-counter increment.
///
/// Sent over a bounded channel so the redirect response never waits on the
/// database write. When the queue is full the event is dropped; the durable
/// count then lags but never goes backwards.
#[derive(Debug, Clone)]
pub struct HitEvent {
    pub short_id: String,
}

impl HitEvent {
    pub fn new(short_id: impl Into<String>) -> Self {
        Self {
            short_id: short_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_event_carries_short_id() {
        let event = HitEvent::new("aB3xY9z");
        assert_eq!(event.short_id, "aB3xY9z");
    }
}
