use async_trait::async_trait;
use deadpool_redis::{Config, Pool, Runtime};
use redis::{AsyncCommands, Script};

use admission_state::error::StateError;
use admission_state::store::StateStore;

use crate::config::RedisConfig;
use crate::scripts;

/// Redis-backed implementation of [`StateStore`].
///
/// Uses a `deadpool-redis` connection pool. `acquire` and
/// `fixed_window_allow` run as Lua scripts so the increment/compare/rollback
/// (or increment/expire/compare) sequence is atomic on the server.
pub struct RedisStateStore {
    pool: Pool,
    default_set_ttl_secs: u64,
}

impl RedisStateStore {
    /// Create a new `RedisStateStore` from the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::Connection`] if the pool cannot be created.
    pub fn new(config: &RedisConfig) -> Result<Self, StateError> {
        let cfg = Config::from_url(&config.url);
        let pool = cfg
            .builder()
            .map(|b| {
                b.max_size(config.pool_size)
                    .wait_timeout(Some(config.connection_timeout))
                    .runtime(Runtime::Tokio1)
                    .build()
            })
            .map_err(|e| StateError::Connection(e.to_string()))?
            .map_err(|e| StateError::Connection(e.to_string()))?;

        Ok(Self {
            pool,
            default_set_ttl_secs: config.default_set_ttl.as_secs(),
        })
    }

    async fn conn(&self) -> Result<deadpool_redis::Connection, StateError> {
        self.pool
            .get()
            .await
            .map_err(|e| StateError::Connection(e.to_string()))
    }
}

#[async_trait]
impl StateStore for RedisStateStore {
    async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self.conn().await.ok()?;
        conn.get::<_, Option<String>>(key).await.ok().flatten()
    }

    async fn set(&self, key: &str, value: &str) {
        let Ok(mut conn) = self.conn().await else {
            return;
        };
        let _: Result<(), _> = conn.set_ex(key, value, self.default_set_ttl_secs).await;
    }

    async fn acquire(&self, key: &str, limit: i64) -> Result<bool, StateError> {
        let mut conn = self.conn().await?;
        let script = Script::new(scripts::ACQUIRE);
        let result: i64 = script
            .key(key)
            .arg(limit)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| StateError::Backend(e.to_string()))?;
        Ok(result == 1)
    }

    async fn release(&self, key: &str) -> Result<(), StateError> {
        let mut conn = self.conn().await?;
        let _: i64 = conn
            .decr(key, 1)
            .await
            .map_err(|e| StateError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn fixed_window_allow(
        &self,
        key: &str,
        limit: i64,
        window_secs: u64,
    ) -> Result<bool, StateError> {
        let mut conn = self.conn().await?;
        let script = Script::new(scripts::FIXED_WINDOW_ALLOW);
        let result: i64 = script
            .key(key)
            .arg(limit)
            .arg(window_secs)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| StateError::Backend(e.to_string()))?;
        Ok(result == 1)
    }
}

#[cfg(all(test, feature = "integration"))]
mod tests {
    use admission_state::testing::run_store_conformance_tests;

    use super::*;
    use crate::config::RedisConfig;

    /// Requires a live Redis instance reachable at `REDIS_URL` (defaults to
    /// `redis://127.0.0.1:6379`). Run with `cargo test --features integration`.
    #[tokio::test]
    async fn conformance() {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".into());
        let store = RedisStateStore::new(&RedisConfig {
            url,
            ..RedisConfig::default()
        })
        .expect("pool creation should succeed");

        run_store_conformance_tests(&store)
            .await
            .expect("conformance tests should pass");
    }
}
