//! Request gate: an in-memory sliding-window limiter and the middleware
//! that applies it to every route.
//!
//! The backend keeps one timestamp log per client key. A request is
//! allowed while fewer than `limit` timestamps fall inside the window;
//! denied requests are not recorded, so a client hammering a full window
//! does not push its own reset further out.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::Json;
use axum::body::Body;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::RETRY_AFTER;
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use marquee_core::rate_limit::{
    RateLimitDecision, RateLimitKey, RateLimitResult, RateLimitRule,
    RateLimiter,
};

use crate::AppState;

/// Floor on how long idle keys are kept before the cleanup task drops
/// them.
const CLEANUP_RETENTION_FLOOR: Duration = Duration::from_secs(3600);

/// How often the background cleanup task runs.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

/// Sliding-window-log limiter over process-local state.
///
/// The write lock serializes updates, so concurrent requests from one
/// client cannot undercount. State is per process; replicas each enforce
/// their own limits.
pub struct MemoryRateLimiter {
    requests: RwLock<HashMap<String, Vec<Instant>>>,
    /// Entries younger than this survive cleanup. At least the configured
    /// window, so cleanup can never reset a count mid-window.
    retention: Duration,
}

impl MemoryRateLimiter {
    pub fn new(window: Duration) -> Self {
        Self {
            requests: RwLock::new(HashMap::new()),
            retention: window.max(CLEANUP_RETENTION_FLOOR),
        }
    }
}

impl Default for MemoryRateLimiter {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl std::fmt::Debug for MemoryRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryRateLimiter").finish_non_exhaustive()
    }
}

#[async_trait]
impl RateLimiter for MemoryRateLimiter {
    async fn check_and_update(
        &self,
        key: &RateLimitKey,
        rule: &RateLimitRule,
    ) -> RateLimitResult<RateLimitDecision> {
        let mut requests = self.requests.write().await;
        let now = Instant::now();

        let timestamps = requests.entry(key.cache_key()).or_default();
        timestamps.retain(|&seen| now.duration_since(seen) < rule.window);

        let allowed = (timestamps.len() as u32) < rule.limit;
        if allowed {
            timestamps.push(now);
        }

        let oldest = timestamps.first().copied().unwrap_or(now);
        let reset_after =
            rule.window.saturating_sub(now.duration_since(oldest));

        Ok(RateLimitDecision {
            allowed,
            current_count: timestamps.len() as u32,
            limit: rule.limit,
            reset_after,
        })
    }

    async fn cleanup_expired(&self) -> RateLimitResult<u64> {
        let mut requests = self.requests.write().await;
        let before = requests.len();
        let now = Instant::now();

        requests.retain(|_, timestamps| {
            timestamps
                .iter()
                .any(|&seen| now.duration_since(seen) < self.retention)
        });

        Ok((before - requests.len()) as u64)
    }
}

/// Periodically drops idle client entries so the key map stays bounded.
pub fn spawn_cleanup_task(limiter: Arc<dyn RateLimiter>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            match limiter.cleanup_expired().await {
                Ok(0) => {}
                Ok(removed) => {
                    debug!("Rate limiter dropped {} idle clients", removed);
                }
                Err(e) => warn!("Rate limiter cleanup failed: {}", e),
            }
        }
    });
}

/// Client identity for the gate: the connected socket address when the
/// listener provides one, else the first `X-Forwarded-For` entry, else a
/// shared unknown bucket.
pub fn client_key(req: &Request<Body>) -> RateLimitKey {
    if let Some(ConnectInfo(addr)) =
        req.extensions().get::<ConnectInfo<SocketAddr>>()
    {
        return RateLimitKey::IpAddress(addr.ip().to_string());
    }

    if let Some(forwarded) = req.headers().get("x-forwarded-for") {
        if let Ok(list) = forwarded.to_str() {
            if let Some(ip) = list.split(',').next() {
                let ip = ip.trim();
                if !ip.is_empty() {
                    return RateLimitKey::IpAddress(ip.to_string());
                }
            }
        }
    }

    RateLimitKey::Unknown
}

/// Middleware gating every request before any handler runs.
///
/// Allowed responses carry `x-ratelimit-*` headers; denials are 429 with
/// `Retry-After`. A limiter backend failure fails open, with a log.
pub async fn enforce_rate_limit(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let settings = &state.config.rate_limit;
    if !settings.enabled {
        return next.run(req).await;
    }

    let key = client_key(&req);
    let rule = settings.rule();

    match state.rate_limiter.check_and_update(&key, &rule).await {
        Ok(decision) if decision.allowed => {
            let mut response = next.run(req).await;
            apply_rate_limit_headers(&mut response, &decision);
            response
        }
        Ok(decision) => {
            warn!("Rate limit exceeded for client {}", key.cache_key());
            rate_limit_exceeded_response(&decision)
        }
        Err(e) => {
            warn!("Rate limiter error: {}, allowing request", e);
            next.run(req).await
        }
    }
}

fn apply_rate_limit_headers(
    response: &mut Response,
    decision: &RateLimitDecision,
) {
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&decision.limit.to_string()) {
        headers.insert("x-ratelimit-limit", value);
    }
    if let Ok(value) = HeaderValue::from_str(&decision.remaining().to_string())
    {
        headers.insert("x-ratelimit-remaining", value);
    }
    if let Ok(value) =
        HeaderValue::from_str(&decision.reset_after.as_secs().to_string())
    {
        headers.insert("x-ratelimit-reset", value);
    }
}

fn rate_limit_exceeded_response(decision: &RateLimitDecision) -> Response {
    let retry_after = decision.retry_after_secs();

    (
        StatusCode::TOO_MANY_REQUESTS,
        [(RETRY_AFTER, retry_after.to_string())],
        Json(json!({
            "error": {
                "message": format!(
                    "Too many requests. Please try again in {} seconds.",
                    retry_after
                ),
                "status": StatusCode::TOO_MANY_REQUESTS.as_u16(),
            }
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(limit: u32, window_secs: u64) -> RateLimitRule {
        RateLimitRule { limit, window: Duration::from_secs(window_secs) }
    }

    #[tokio::test]
    async fn allows_until_limit_then_denies() {
        let limiter = MemoryRateLimiter::new(Duration::from_secs(60));
        let key = RateLimitKey::IpAddress("192.168.1.1".to_string());
        let rule = rule(3, 60);

        for expected_count in 1..=3 {
            let decision = limiter
                .check_and_update(&key, &rule)
                .await
                .expect("limiter should not fail");
            assert!(decision.allowed);
            assert_eq!(decision.current_count, expected_count);
        }

        let denied = limiter
            .check_and_update(&key, &rule)
            .await
            .expect("limiter should not fail");
        assert!(!denied.allowed);
        assert_eq!(denied.remaining(), 0);
        assert!(denied.retry_after_secs() >= 1);
    }

    #[tokio::test]
    async fn denied_requests_do_not_consume_capacity() {
        let limiter = MemoryRateLimiter::new(Duration::from_secs(60));
        let key = RateLimitKey::IpAddress("192.168.1.2".to_string());
        let rule = rule(2, 60);

        limiter.check_and_update(&key, &rule).await.unwrap();
        limiter.check_and_update(&key, &rule).await.unwrap();

        for _ in 0..5 {
            let denied = limiter.check_and_update(&key, &rule).await.unwrap();
            assert!(!denied.allowed);
            assert_eq!(denied.current_count, 2);
        }
    }

    #[tokio::test]
    async fn window_expiry_restores_capacity() {
        let limiter = MemoryRateLimiter::new(Duration::from_secs(1));
        let key = RateLimitKey::IpAddress("192.168.1.3".to_string());
        let rule = rule(1, 1);

        assert!(limiter.check_and_update(&key, &rule).await.unwrap().allowed);
        assert!(!limiter.check_and_update(&key, &rule).await.unwrap().allowed);

        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert!(limiter.check_and_update(&key, &rule).await.unwrap().allowed);
    }

    #[tokio::test]
    async fn keys_are_tracked_independently() {
        let limiter = MemoryRateLimiter::new(Duration::from_secs(60));
        let first = RateLimitKey::IpAddress("10.0.0.1".to_string());
        let second = RateLimitKey::IpAddress("10.0.0.2".to_string());
        let rule = rule(1, 60);

        assert!(limiter.check_and_update(&first, &rule).await.unwrap().allowed);
        assert!(!limiter.check_and_update(&first, &rule).await.unwrap().allowed);
        assert!(limiter.check_and_update(&second, &rule).await.unwrap().allowed);
    }

    #[tokio::test]
    async fn cleanup_reports_removed_keys() {
        let limiter = MemoryRateLimiter::new(Duration::from_secs(60));
        let key = RateLimitKey::IpAddress("10.0.0.3".to_string());
        limiter.check_and_update(&key, &rule(5, 60)).await.unwrap();

        // Fresh entries survive the retention horizon.
        assert_eq!(limiter.cleanup_expired().await.unwrap(), 0);
    }

    #[test]
    fn retention_never_undercuts_the_window() {
        let short = MemoryRateLimiter::new(Duration::from_secs(60));
        assert_eq!(short.retention, Duration::from_secs(3600));

        let long = MemoryRateLimiter::new(Duration::from_secs(7200));
        assert_eq!(long.retention, Duration::from_secs(7200));
    }

    #[tokio::test]
    async fn cleanup_keeps_counts_inside_a_long_window() {
        let window = Duration::from_secs(7200);
        let limiter = MemoryRateLimiter::new(window);
        let key = RateLimitKey::IpAddress("10.0.0.4".to_string());
        let rule = RateLimitRule { limit: 2, window };

        limiter.check_and_update(&key, &rule).await.unwrap();
        limiter.check_and_update(&key, &rule).await.unwrap();

        assert_eq!(limiter.cleanup_expired().await.unwrap(), 0);

        let denied = limiter.check_and_update(&key, &rule).await.unwrap();
        assert!(!denied.allowed);
        assert_eq!(denied.current_count, 2);
    }

    #[test]
    fn client_key_prefers_connect_info() {
        let mut req = Request::builder()
            .uri("/movies")
            .body(Body::empty())
            .unwrap();
        let addr: SocketAddr = "198.51.100.4:9000".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        req.headers_mut().insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7"),
        );

        let key = client_key(&req);
        assert_eq!(key, RateLimitKey::IpAddress("198.51.100.4".to_string()));
    }

    #[test]
    fn client_key_falls_back_to_forwarded_header() {
        let mut req = Request::builder()
            .uri("/movies")
            .body(Body::empty())
            .unwrap();
        req.headers_mut().insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 70.41.3.18"),
        );

        assert_eq!(
            client_key(&req),
            RateLimitKey::IpAddress("203.0.113.7".to_string())
        );
    }

    #[test]
    fn client_key_without_identifiers_is_unknown() {
        let req = Request::builder()
            .uri("/movies")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_key(&req), RateLimitKey::Unknown);
    }
}
