use serde::Deserialize;

/// Which `StateStore` implementation to construct at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateBackend {
    Memory,
    Redis,
}

impl Default for StateBackend {
    fn default() -> Self {
        Self::Memory
    }
}

/// Shared-store configuration: which backend to use and how to reach it.
#[derive(Debug, Deserialize)]
pub struct StateConfig {
    #[serde(default)]
    pub backend: StateBackend,
    /// Remote store address. Required when `backend = "redis"`.
    pub store_addr: Option<String>,
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
    #[serde(default = "default_connection_timeout_seconds")]
    pub connection_timeout_seconds: u64,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            backend: StateBackend::default(),
            store_addr: None,
            pool_size: default_pool_size(),
            connection_timeout_seconds: default_connection_timeout_seconds(),
        }
    }
}

fn default_pool_size() -> usize {
    10
}

fn default_connection_timeout_seconds() -> u64 {
    5
}
