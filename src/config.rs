use std::env;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Base URL of the upstream NGX quote API. When unset the simulated
    /// feed is used instead.
    pub upstream_url: Option<String>,
    /// Refresh cycle cadence in seconds. Must be at least as frequent as
    /// the dashboard's 60 second poll so stale data is never served
    /// silently.
    pub refresh_interval_secs: u64,
    /// Per-symbol fetch/compute deadline in milliseconds. A symbol that
    /// exceeds it is abandoned for the cycle and its prior signal kept.
    pub symbol_timeout_ms: u64,
    /// Lookback window for the accuracy figure, in hours.
    pub accuracy_lookback_hours: i64,
    /// Hours an open plan may stay unresolved before it expires neutral.
    pub plan_expiry_hours: i64,
}

impl Config {
    /// Load configuration from environment variables with sane defaults.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3001),
            upstream_url: env::var("NGX_UPSTREAM_URL").ok().filter(|s| !s.is_empty()),
            refresh_interval_secs: env::var("REFRESH_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            symbol_timeout_ms: env::var("SYMBOL_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5_000),
            accuracy_lookback_hours: env::var("ACCURACY_LOOKBACK_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(24 * 30),
            plan_expiry_hours: env::var("PLAN_EXPIRY_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(72),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            upstream_url: None,
            refresh_interval_secs: 30,
            symbol_timeout_ms: 5_000,
            accuracy_lookback_hours: 24 * 30,
            plan_expiry_hours: 72,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 3001);
        assert!(config.upstream_url.is_none());
        // Backend refresh must be at least as frequent as the 60s poll.
        assert!(config.refresh_interval_secs <= 60);
    }
}
