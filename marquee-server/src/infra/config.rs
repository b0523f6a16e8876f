//! Environment-driven configuration.

use std::env;
use std::time::Duration;

use marquee_core::rate_limit::RateLimitRule;

/// Runtime configuration, read once at startup.
///
/// Every knob has a default except `DATABASE_URL`, which has no sensible
/// one; it is checked where the pool is built.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address for the HTTP listener (`SERVER_HOST`).
    pub server_host: String,
    /// Bind port for the HTTP listener (`SERVER_PORT`).
    pub server_port: u16,
    /// PostgreSQL connection string (`DATABASE_URL`).
    pub database_url: Option<String>,
    /// Origins allowed by CORS (`CORS_ALLOWED_ORIGINS`, comma separated).
    /// Empty means permissive.
    pub cors_allowed_origins: Vec<String>,
    /// Request gate tuning.
    pub rate_limit: RateLimitSettings,
}

/// Tuning for the rate-limit gate in front of every route.
#[derive(Debug, Clone)]
pub struct RateLimitSettings {
    /// Master switch (`RATE_LIMIT_ENABLED`).
    pub enabled: bool,
    /// Allowed requests per window per client (`RATE_LIMIT_MAX_REQUESTS`).
    pub max_requests: u32,
    /// Window length (`RATE_LIMIT_WINDOW_SECS`).
    pub window: Duration,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: 60,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitSettings {
    /// The rule handed to the limiter on every request.
    pub fn rule(&self) -> RateLimitRule {
        RateLimitRule {
            limit: self.max_requests,
            window: self.window,
        }
    }
}

impl Config {
    /// Load configuration from the environment, reading `.env` first when
    /// present. Unset or unparsable values fall back to their defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let limit_defaults = RateLimitSettings::default();
        let rate_limit = RateLimitSettings {
            enabled: env_parsed("RATE_LIMIT_ENABLED", limit_defaults.enabled),
            max_requests: env_parsed(
                "RATE_LIMIT_MAX_REQUESTS",
                limit_defaults.max_requests,
            ),
            window: Duration::from_secs(env_parsed(
                "RATE_LIMIT_WINDOW_SECS",
                limit_defaults.window.as_secs(),
            )),
        };

        Self {
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env_parsed("SERVER_PORT", 3000),
            database_url: env::var("DATABASE_URL").ok(),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|origin| !origin.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            rate_limit,
        }
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_project_into_a_rule() {
        let settings = RateLimitSettings {
            enabled: true,
            max_requests: 5,
            window: Duration::from_secs(30),
        };

        let rule = settings.rule();
        assert_eq!(rule.limit, 5);
        assert_eq!(rule.window, Duration::from_secs(30));
    }

    #[test]
    fn defaults_are_sixty_per_minute() {
        let settings = RateLimitSettings::default();
        assert!(settings.enabled);
        assert_eq!(settings.max_requests, 60);
        assert_eq!(settings.window, Duration::from_secs(60));
    }
}
