use serde::Deserialize;

/// Distributed rate-limiter configuration, applied uniformly to every
/// tenant.
#[derive(Debug, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_rate_limit")]
    pub rate_limit: i64,
    #[serde(default = "default_rate_window_seconds")]
    pub rate_window_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            rate_limit: default_rate_limit(),
            rate_window_seconds: default_rate_window_seconds(),
        }
    }
}

fn default_rate_limit() -> i64 {
    100
}

fn default_rate_window_seconds() -> u64 {
    60
}
