use std::sync::Arc;

use admission_core::RequestId;
use admission_state::key::idem_key;
use admission_state::StateStore;

/// Upper bound on a plausible client retry horizon. This is the same
/// constant the bundled `StateStore` backends default their `set` TTL to —
/// re-exported here under its idempotency-specific name so callers don't
/// need to know it lives in `admission-state`.
pub use admission_state::DEFAULT_TTL as IDEMPOTENCY_TTL;

/// Thin wrapper over a [`StateStore`] answering "has this request id been
/// decided before?".
///
/// Carries no negative cache: a `false` from [`seen`](Idempotency::seen)
/// does not prevent another replica from concurrently marking the same id —
/// two replicas may both observe `false` for the same id and both run the
/// full pipeline before either marks it.
pub struct Idempotency {
    store: Arc<dyn StateStore>,
}

impl Idempotency {
    #[must_use]
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    /// Returns `true` if `request_id` has already been marked as decided.
    pub async fn seen(&self, request_id: &RequestId) -> bool {
        self.store.get(&idem_key(request_id)).await.is_some()
    }

    /// Mark `request_id` as decided (idempotent — marking twice is fine).
    pub async fn mark(&self, request_id: &RequestId) {
        self.store.set(&idem_key(request_id), "seen").await;
    }
}
