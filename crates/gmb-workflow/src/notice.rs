use std::time::{Duration, Instant};

/// A transient confirmation that hides itself after `ttl`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    message: String,
    raised_at: Instant,
    ttl: Duration,
}

impl Notice {
    #[must_use]
    pub fn new(message: impl Into<String>, raised_at: Instant, ttl: Duration) -> Self {
        Self {
            message: message.into(),
            raised_at,
            ttl,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn is_visible(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.raised_at) < self.ttl
    }
}
