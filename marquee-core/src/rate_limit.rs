//! Rate limiting model for the request gate.
//!
//! The gate sits in front of every handler and tracks request counts per
//! client identity. This module is backend-agnostic: it defines the key,
//! rule, and decision types plus the [`RateLimiter`] trait; the in-memory
//! sliding-window backend lives with the HTTP middleware that uses it.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur inside a rate limiter backend.
#[derive(Debug, Error)]
pub enum RateLimitError {
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for rate limiting operations
pub type RateLimitResult<T> = Result<T, RateLimitError>;

/// Identifier a limit is tracked under.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum RateLimitKey {
    /// Source address of the request; the key used when no authentication
    /// exists to identify clients more precisely.
    IpAddress(String),

    /// Requests whose source cannot be determined share a single bucket.
    Unknown,
}

impl RateLimitKey {
    /// Render the key for storage in a limiter backend.
    pub fn cache_key(&self) -> String {
        match self {
            Self::IpAddress(ip) => format!("ip:{}", ip),
            Self::Unknown => "unknown".to_string(),
        }
    }
}

/// One limiting policy: at most `limit` requests per `window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRule {
    /// Maximum number of requests allowed in the window
    pub limit: u32,

    /// Time window for the limit
    pub window: Duration,
}

impl Default for RateLimitRule {
    fn default() -> Self {
        Self { limit: 60, window: Duration::from_secs(60) }
    }
}

/// Decision returned by a rate limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    /// Whether the request is allowed
    pub allowed: bool,

    /// Requests recorded in the current window, this one included when it
    /// was allowed
    pub current_count: u32,

    /// Maximum allowed requests
    pub limit: u32,

    /// Time until the oldest recorded request leaves the window
    pub reset_after: Duration,
}

impl RateLimitDecision {
    /// Requests the client may still make in the current window.
    pub fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.current_count)
    }

    /// Seconds a denied client should wait before retrying, rounded up and
    /// never zero.
    pub fn retry_after_secs(&self) -> u64 {
        let secs = self.reset_after.as_secs();
        if self.reset_after.subsec_nanos() > 0 {
            secs + 1
        } else {
            secs.max(1)
        }
    }
}

/// Backend-agnostic limiter. Implementations must be safe for concurrent
/// use; updates for one key are serialized so bursts cannot undercount.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Check whether a request under `key` may proceed per `rule`, recording
    /// it when allowed. Denied requests consume no window capacity.
    async fn check_and_update(
        &self,
        key: &RateLimitKey,
        rule: &RateLimitRule,
    ) -> RateLimitResult<RateLimitDecision>;

    /// Drop state that can no longer influence any decision (maintenance
    /// operation). Returns the number of keys removed.
    async fn cleanup_expired(&self) -> RateLimitResult<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_namespaces_by_kind() {
        let ip = RateLimitKey::IpAddress("203.0.113.9".to_string());
        assert_eq!(ip.cache_key(), "ip:203.0.113.9");
        assert_eq!(RateLimitKey::Unknown.cache_key(), "unknown");
    }

    #[test]
    fn remaining_saturates_at_zero() {
        let decision = RateLimitDecision {
            allowed: false,
            current_count: 61,
            limit: 60,
            reset_after: Duration::from_secs(12),
        };
        assert_eq!(decision.remaining(), 0);
    }

    #[test]
    fn retry_after_rounds_up_and_never_reports_zero() {
        let partial = RateLimitDecision {
            allowed: false,
            current_count: 60,
            limit: 60,
            reset_after: Duration::from_millis(2500),
        };
        assert_eq!(partial.retry_after_secs(), 3);

        let exhausted = RateLimitDecision {
            allowed: false,
            current_count: 60,
            limit: 60,
            reset_after: Duration::ZERO,
        };
        assert_eq!(exhausted.retry_after_secs(), 1);
    }
}
