use serde::{Deserialize, Serialize};

use crate::types::{OrgId, RequestId};

/// An inbound execution request awaiting an admission decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    /// Opaque, caller-unique idempotency key.
    pub request_id: RequestId,
    /// Tenant the request is billed/rate-limited against.
    pub org_id: OrgId,
    /// Number of users the execution will run for.
    pub users: u32,
    /// Requested execution duration, in seconds.
    pub duration: u32,
}

/// The admission decision returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResponse {
    pub allowed: bool,
    /// Human-readable reason. Empty iff `allowed`.
    pub reason: String,
}

impl ExecutionResponse {
    /// Build an ALLOWED response.
    #[must_use]
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            reason: String::new(),
        }
    }

    /// Build a DENIED response with the given reason.
    #[must_use]
    pub fn denied(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: reason.into(),
        }
    }
}

/// Projection of an [`ExecutionRequest`] passed to policy rules.
///
/// Rules never see `request_id`: it plays no role in policy evaluation and
/// keeping it out of `PolicyContext` stops a rule author from accidentally
/// keying a decision off an idempotency token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyContext {
    pub org_id: OrgId,
    pub users: u32,
    pub duration: u32,
}

impl From<&ExecutionRequest> for PolicyContext {
    fn from(req: &ExecutionRequest) -> Self {
        Self {
            org_id: req.org_id.clone(),
            users: req.users,
            duration: req.duration,
        }
    }
}
