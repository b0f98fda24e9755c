use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};

/// Default local in-flight ceiling.
pub const DEFAULT_MAX_INFLIGHT: u32 = 500;

/// Per-replica bounded concurrency gate.
///
/// A lock-free atomic counter, not a semaphore with a wait queue: rejection
/// is local and immediate, never blocking or queuing.
pub struct Shedder {
    inflight: AtomicI64,
    max_inflight: AtomicU32,
}

impl Default for Shedder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_INFLIGHT)
    }
}

impl Shedder {
    #[must_use]
    pub fn new(max_inflight: u32) -> Self {
        Self {
            inflight: AtomicI64::new(0),
            max_inflight: AtomicU32::new(max_inflight),
        }
    }

    /// Attempt to acquire a concurrency slot.
    ///
    /// Returns `true` if the caller may proceed; `false` if the replica is
    /// already at its limit (the request should be rejected as overloaded).
    /// On rejection the counter is rolled back immediately so it never
    /// exceeds the configured limit.
    pub fn enter(&self) -> bool {
        let current = self.inflight.fetch_add(1, Ordering::SeqCst) + 1;
        let limit = i64::from(self.max_inflight.load(Ordering::SeqCst));

        if current > limit {
            self.inflight.fetch_sub(1, Ordering::SeqCst);
            tracing::warn!(current_inflight = current, limit, "load shedding triggered");
            return false;
        }
        true
    }

    /// Release a concurrency slot. Must be called exactly once for each
    /// `enter` that returned `true`.
    pub fn exit(&self) {
        self.inflight.fetch_sub(1, Ordering::SeqCst);
    }

    /// Atomically update the concurrency limit at runtime.
    pub fn set_limit(&self, limit: u32) {
        self.max_inflight.store(limit, Ordering::SeqCst);
    }

    /// Current in-flight count. Exposed for tests and metrics.
    #[must_use]
    pub fn inflight(&self) -> i64 {
        self.inflight.load(Ordering::SeqCst)
    }
}
