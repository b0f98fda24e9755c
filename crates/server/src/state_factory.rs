use std::sync::Arc;
use std::time::Duration;

use admission_core::AdmissionError;
use admission_state::StateStore;
use admission_state_memory::MemoryStateStore;
use admission_state_redis::{RedisConfig, RedisStateStore};

use crate::config::{StateBackend, StateConfig};

/// Construct the `StateStore` backend named in configuration.
pub async fn create_state(config: &StateConfig) -> Result<Arc<dyn StateStore>, AdmissionError> {
    match config.backend {
        StateBackend::Memory => Ok(Arc::new(MemoryStateStore::default())),
        StateBackend::Redis => {
            let url = config
                .store_addr
                .clone()
                .ok_or_else(|| AdmissionError::Configuration("store.store_addr is required for the redis backend".into()))?;
            let redis_config = RedisConfig {
                url,
                pool_size: config.pool_size,
                connection_timeout: Duration::from_secs(config.connection_timeout_seconds),
                ..RedisConfig::default()
            };
            let store = RedisStateStore::new(&redis_config)
                .map_err(|e| AdmissionError::Configuration(format!("redis store: {e}")))?;
            Ok(Arc::new(store))
        }
    }
}
