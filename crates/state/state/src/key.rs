/// The two reserved key namespaces the admission pipeline writes into.
///
/// Kept as plain render functions rather than a `StateKey` struct: the
/// store's keyspace here is fixed and small (two namespaces), so a general
/// composite-key abstraction would be speculative.
use admission_core::{OrgId, RequestId};

/// Render the idempotency-marker key for a request id: `idem:<request_id>`.
#[must_use]
pub fn idem_key(request_id: &RequestId) -> String {
    format!("idem:{request_id}")
}

/// Render the rate-limit counter key for a tenant: `ratelimit:<org_id>`.
#[must_use]
pub fn ratelimit_key(org_id: &OrgId) -> String {
    format!("ratelimit:{org_id}")
}
