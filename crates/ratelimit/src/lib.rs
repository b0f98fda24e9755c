use std::sync::Arc;
use std::time::Duration;

use admission_core::OrgId;
use admission_state::key::ratelimit_key;
use admission_state::{StateError, StateStore};
use thiserror::Error;

/// Default per-tenant rate: 100 requests per 60-second window, the
/// admission pipeline's default rate-limit parameters.
pub const DEFAULT_LIMIT: i64 = 100;
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Error surfaced when the rate limiter cannot reach its backing store.
///
/// Kept distinct from "denied": a transport failure and a denial are
/// different outcomes the caller must be able to tell apart.
#[derive(Debug, Error)]
#[error("rate limit backend error: {0}")]
pub struct RateLimitError(#[from] StateError);

/// Per-tenant distributed fixed-window rate limiter.
///
/// Evaluated as a single atomic script on the shared store, keyed by
/// `ratelimit:<org_id>`. At window boundaries up to `2 * limit` requests may
/// succeed across two adjacent windows; this is an accepted property of
/// fixed-window limiting, not a bug.
pub struct RateLimiter {
    store: Arc<dyn StateStore>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    /// Evaluate the limit for `org_id`. Returns `Ok(true)` if the request is
    /// admitted, `Ok(false)` if the tenant's window is exhausted, or
    /// `Err` if the backend could not be reached.
    pub async fn allow(
        &self,
        org_id: &OrgId,
        limit: i64,
        window: Duration,
    ) -> Result<bool, RateLimitError> {
        let key = ratelimit_key(org_id);
        let window_secs = window.as_secs().max(1);
        self.store
            .fixed_window_allow(&key, limit, window_secs)
            .await
            .map_err(RateLimitError::from)
    }
}

#[cfg(test)]
mod tests {
    use admission_state_memory::MemoryStateStore;

    use super::*;

    #[tokio::test]
    async fn admits_up_to_the_limit() {
        let limiter = RateLimiter::new(Arc::new(MemoryStateStore::new()));
        let org = OrgId::new("pro");
        for _ in 0..100 {
            assert!(limiter.allow(&org, 100, Duration::from_secs(60)).await.unwrap());
        }
        assert!(
            !limiter.allow(&org, 100, Duration::from_secs(60)).await.unwrap(),
            "101st call in the same window should be denied"
        );
    }

    #[tokio::test]
    async fn tenants_are_independent() {
        let limiter = RateLimiter::new(Arc::new(MemoryStateStore::new()));
        for _ in 0..5 {
            assert!(limiter
                .allow(&OrgId::new("free-tier"), 5, Duration::from_secs(60))
                .await
                .unwrap());
        }
        assert!(limiter
            .allow(&OrgId::new("pro"), 5, Duration::from_secs(60))
            .await
            .unwrap());
    }
}
