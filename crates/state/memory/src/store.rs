use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::time::Instant;

use admission_state::error::StateError;
use admission_state::store::StateStore;
use admission_state::DEFAULT_TTL;

struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

struct Counter {
    value: AtomicI64,
    window_expires_at: std::sync::Mutex<Option<Instant>>,
}

/// In-memory [`StateStore`] backed by [`DashMap`]s.
///
/// Entries are lazily evicted on read once their TTL has elapsed. Intended
/// for tests and single-replica local runs; see `admission-state-redis` for
/// the backend used across a replica set.
#[derive(Default)]
pub struct MemoryStateStore {
    data: DashMap<String, Entry>,
    counters: DashMap<String, Counter>,
}

impl MemoryStateStore {
    /// Create a new, empty in-memory state store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn get(&self, key: &str) -> Option<String> {
        let entry = self.data.get(key)?;
        if entry.is_expired() {
            drop(entry);
            self.data.remove(key);
            return None;
        }
        Some(entry.value.clone())
    }

    async fn set(&self, key: &str, value: &str) {
        self.data.insert(
            key.to_owned(),
            Entry {
                value: value.to_owned(),
                expires_at: Instant::now() + DEFAULT_TTL,
            },
        );
    }

    async fn acquire(&self, key: &str, limit: i64) -> Result<bool, StateError> {
        let counter = self
            .counters
            .entry(key.to_owned())
            .or_insert_with(|| Counter {
                value: AtomicI64::new(0),
                window_expires_at: std::sync::Mutex::new(None),
            });

        let current = counter.value.fetch_add(1, Ordering::SeqCst) + 1;
        if current > limit {
            counter.value.fetch_sub(1, Ordering::SeqCst);
            return Ok(false);
        }
        Ok(true)
    }

    async fn release(&self, key: &str) -> Result<(), StateError> {
        if let Some(counter) = self.counters.get(key) {
            counter.value.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(())
    }

    async fn fixed_window_allow(
        &self,
        key: &str,
        limit: i64,
        window_secs: u64,
    ) -> Result<bool, StateError> {
        let counter = self
            .counters
            .entry(key.to_owned())
            .or_insert_with(|| Counter {
                value: AtomicI64::new(0),
                window_expires_at: std::sync::Mutex::new(None),
            });

        let mut window = counter
            .window_expires_at
            .lock()
            .map_err(|_| StateError::Backend("fixed window lock poisoned".into()))?;

        let now = Instant::now();
        let window_is_live = window.is_some_and(|deadline| now < deadline);

        let current = if window_is_live {
            counter.value.fetch_add(1, Ordering::SeqCst) + 1
        } else {
            *window = Some(now + Duration::from_secs(window_secs));
            counter.value.store(1, Ordering::SeqCst);
            1
        };

        Ok(current <= limit)
    }
}
