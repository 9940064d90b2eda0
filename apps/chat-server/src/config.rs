//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use synthea_core::service::DEFAULT_SESSION_KEY;
use synthea_infra::RateLimitConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Per-session sliding window.
    pub rate_limit: RateLimitConfig,
    pub default_session_key: String,
    /// Per-session history cap; `None` keeps every turn.
    pub history_max_turns: Option<usize>,
    /// Per-client requests per minute across all routes; `None` disables it.
    pub ingress_per_minute: Option<u32>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup. Unparseable values fall back
    /// to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_var(&lookup, "PORT").unwrap_or(8080),
            rate_limit: RateLimitConfig {
                max_requests: parse_var(&lookup, "RATE_LIMIT_MAX_REQUESTS").unwrap_or(10),
                window: Duration::from_secs(
                    parse_var(&lookup, "RATE_LIMIT_WINDOW_SECS").unwrap_or(60),
                ),
            },
            default_session_key: lookup("DEFAULT_SESSION_KEY")
                .unwrap_or_else(|| DEFAULT_SESSION_KEY.to_string()),
            history_max_turns: parse_var(&lookup, "HISTORY_MAX_TURNS"),
            ingress_per_minute: parse_var(&lookup, "INGRESS_RATE_LIMIT_PER_MINUTE"),
        }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|value| value.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.rate_limit.max_requests, 10);
        assert_eq!(config.rate_limit.window, Duration::from_secs(60));
        assert_eq!(config.default_session_key, "default_session");
        assert_eq!(config.history_max_turns, None);
        assert_eq!(config.ingress_per_minute, None);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "3000"),
            ("RATE_LIMIT_MAX_REQUESTS", " 5 "),
            ("RATE_LIMIT_WINDOW_SECS", "30"),
            ("DEFAULT_SESSION_KEY", "anon"),
            ("HISTORY_MAX_TURNS", "100"),
            ("INGRESS_RATE_LIMIT_PER_MINUTE", "600"),
        ]);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.rate_limit.max_requests, 5);
        assert_eq!(config.rate_limit.window, Duration::from_secs(30));
        assert_eq!(config.default_session_key, "anon");
        assert_eq!(config.history_max_turns, Some(100));
        assert_eq!(config.ingress_per_minute, Some(600));
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = config_from(&[("PORT", "eighty"), ("RATE_LIMIT_MAX_REQUESTS", "-1")]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.rate_limit.max_requests, 10);
    }
}
