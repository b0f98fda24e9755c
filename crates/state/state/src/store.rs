use async_trait::async_trait;

use crate::error::StateError;

/// Shared distributed key-value contract used by every replica.
///
/// Absence and transport failure both surface as `Ok(None)` from [`get`] —
/// callers that need to distinguish "not present" from "backend unreachable"
/// use [`acquire`]/[`release`] or the rate limiter, which do return errors.
///
/// Implementations must be `Send + Sync` to be shared across the tasks
/// handling concurrent RPCs.
///
/// [`get`]: StateStore::get
/// [`acquire`]: StateStore::acquire
/// [`release`]: StateStore::release
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Fetch the value stored at `key`, if any. Never fails loudly.
    async fn get(&self, key: &str) -> Option<String>;

    /// Store `value` at `key`, fire-and-forget from the caller's point of
    /// view. The backend may apply its own default TTL policy.
    async fn set(&self, key: &str, value: &str);

    /// Atomically increment the counter at `key` and compare against
    /// `limit`. Returns `true` iff the post-increment value is `<= limit`;
    /// otherwise the increment is rolled back and `false` is returned.
    ///
    /// The increment-then-compare-then-rollback sequence is not atomic as a
    /// whole on the remote backend: under concurrent callers the ceiling can
    /// be momentarily exceeded by the number of racing callers before
    /// rollback completes. This is an accepted, bounded over-admission (see
    /// the rate limiter, which uses a strictly atomic script instead).
    async fn acquire(&self, key: &str, limit: i64) -> Result<bool, StateError>;

    /// Atomically decrement the counter at `key`.
    async fn release(&self, key: &str) -> Result<(), StateError>;

    /// Evaluate a fixed-window rate limit atomically: increment the counter
    /// at `key`, arm a `window_secs`-second expiry the first time the key is
    /// created, and return whether the post-increment value is `<= limit`.
    ///
    /// Unlike [`acquire`](StateStore::acquire), this must be atomic as a
    /// whole (increment, conditional-expire, and compare happen without any
    /// other caller observing an intermediate state) — see
    /// `admission-ratelimit` for the caller-facing contract.
    async fn fixed_window_allow(
        &self,
        key: &str,
        limit: i64,
        window_secs: u64,
    ) -> Result<bool, StateError>;
}
