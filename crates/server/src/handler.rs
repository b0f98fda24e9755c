use std::sync::Arc;
use std::time::{Duration, Instant};

use admission_core::{ExecutionRequest, ExecutionResponse};
use admission_audit::{AuditAction, AuditSink};
use admission_dedupe::Idempotency;
use admission_policy::PolicyEngine;
use admission_ratelimit::RateLimiter;
use admission_shed::Shedder;
use admission_state::StateStore;

/// Wall-clock budget for the whole pipeline.
pub const DEADLINE: Duration = Duration::from_secs(2);

/// The composed decision pipeline, built once at startup and shared
/// across every gRPC task behind an `Arc` — no per-request construction,
/// no mutable global singletons.
pub struct AdmissionHandler {
    idempotency: Idempotency,
    shedder: Shedder,
    rate_limiter: RateLimiter,
    policy: PolicyEngine,
    audit: AuditSink,
    rate_limit: i64,
    rate_window: Duration,
}

impl AdmissionHandler {
    pub fn new(
        store: Arc<dyn StateStore>,
        shedder: Shedder,
        policy: PolicyEngine,
        audit: AuditSink,
        rate_limit: i64,
        rate_window: Duration,
    ) -> Self {
        Self {
            idempotency: Idempotency::new(Arc::clone(&store)),
            shedder,
            rate_limiter: RateLimiter::new(store),
            policy,
            audit,
            rate_limit,
            rate_window,
        }
    }

    /// Current local in-flight count, forwarded from the shedder. Exposed
    /// for tests and metrics.
    #[must_use]
    pub fn inflight(&self) -> i64 {
        self.shedder.inflight()
    }

    /// Run the eight-step admission pipeline for a single request.
    ///
    /// The caller is expected to run this on its own task, race it against
    /// `tokio::time::timeout` with [`DEADLINE`], translate an elapsed
    /// deadline into a transport error, and `abort()` the task on timeout —
    /// dropping a `JoinHandle` alone detaches the task rather than
    /// cancelling it. This function itself never checks the clock beyond
    /// what that wrapper enforces, so cancellation always lands between
    /// `await` points and the shedder slot reservation below is always
    /// released via the guard regardless of where cancellation occurs.
    pub async fn validate_execution(&self, request: ExecutionRequest) -> ExecutionResponse {
        let start = Instant::now();

        // Step 2: idempotency short-circuit. No other side effect occurs.
        if self.idempotency.seen(&request.request_id).await {
            record_metrics(start, "allowed");
            return ExecutionResponse::allowed();
        }

        // Step 3/4: local load shedder, released on every exit path via
        // the guard regardless of which branch below returns.
        if !self.shedder.enter() {
            metrics::counter!("admission_policy_denied_total", "reason" => "overload").increment(1);
            record_metrics(start, "denied");
            return ExecutionResponse::denied("system overloaded");
        }
        let _shed_guard = ShedGuard::new(&self.shedder);

        // Step 5: distributed rate limiter.
        match self
            .rate_limiter
            .allow(&request.org_id, self.rate_limit, self.rate_window)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                metrics::counter!("admission_policy_denied_total", "reason" => "ratelimit")
                    .increment(1);
                record_metrics(start, "denied");
                return ExecutionResponse::denied("rate limit exceeded");
            }
            Err(e) => {
                tracing::warn!(error = %e, org_id = %request.org_id, "rate limiter backend error");
                record_metrics(start, "denied");
                return ExecutionResponse::denied("rate limit error");
            }
        }

        // Step 6: policy evaluation.
        let ctx = (&request).into();
        if let Err(reason) = self.policy.evaluate(&ctx) {
            metrics::counter!("admission_policy_denied_total", "reason" => "policy").increment(1);
            self.audit
                .record(request.org_id.clone(), AuditAction::Denied, reason.clone());
            record_metrics(start, "denied");
            return ExecutionResponse::denied(reason);
        }

        // Step 7/8: mark idempotent and emit the ALLOWED audit record.
        self.idempotency.mark(&request.request_id).await;
        self.audit.record(request.org_id.clone(), AuditAction::Allowed, "");
        record_metrics(start, "allowed");
        ExecutionResponse::allowed()
    }
}

fn record_metrics(start: Instant, status: &'static str) {
    metrics::counter!("admission_requests_total", "method" => "ValidateExecution", "status" => status)
        .increment(1);
    metrics::histogram!("admission_request_duration_seconds", "method" => "ValidateExecution")
        .record(start.elapsed().as_secs_f64());
}

/// Releases the shedder slot on drop, so cancellation at any `await`
/// point inside [`AdmissionHandler::validate_execution`] after step 4
/// still frees the slot.
struct ShedGuard<'a> {
    shedder: &'a Shedder,
}

impl<'a> ShedGuard<'a> {
    fn new(shedder: &'a Shedder) -> Self {
        Self { shedder }
    }
}

impl Drop for ShedGuard<'_> {
    fn drop(&mut self) {
        self.shedder.exit();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use admission_core::{OrgId, RequestId};
    use admission_policy::PolicyEngine;
    use admission_state_memory::MemoryStateStore;

    use super::*;

    fn handler(rate_limit: i64, max_inflight: u32) -> AdmissionHandler {
        let store: Arc<dyn StateStore> = Arc::new(MemoryStateStore::default());
        let (audit, _handle) = AuditSink::spawn();
        AdmissionHandler::new(
            store,
            Shedder::new(max_inflight),
            PolicyEngine::default_engine(),
            audit,
            rate_limit,
            Duration::from_secs(60),
        )
    }

    fn request(id: &str, org: &str, users: u32, duration: u32) -> ExecutionRequest {
        ExecutionRequest {
            request_id: RequestId::new(id),
            org_id: OrgId::new(org),
            users,
            duration,
        }
    }

    #[tokio::test]
    async fn allows_a_well_formed_request() {
        let h = handler(100, 500);
        let resp = h.validate_execution(request("r1", "pro", 5, 600)).await;
        assert!(resp.allowed);
        assert!(resp.reason.is_empty());
    }

    #[tokio::test]
    async fn repeated_request_id_is_idempotent() {
        let h = handler(100, 500);
        let first = h.validate_execution(request("r1", "pro", 5, 600)).await;
        let second = h.validate_execution(request("r1", "pro", 5, 600)).await;
        assert!(first.allowed);
        assert!(second.allowed);
    }

    #[tokio::test]
    async fn policy_violation_is_denied_with_reason() {
        let h = handler(100, 500);
        // MaxDuration(3600) rejects a duration above one hour.
        let resp = h.validate_execution(request("r1", "pro", 5, 7200)).await;
        assert!(!resp.allowed);
        assert_eq!(resp.reason, "duration limit exceeded");
    }

    #[tokio::test]
    async fn rate_limit_ceiling_is_enforced() {
        let h = handler(3, 500);
        for i in 0..3 {
            let resp = h
                .validate_execution(request(&format!("r{i}"), "pro", 1, 60))
                .await;
            assert!(resp.allowed, "request {i} should be allowed");
        }
        let resp = h.validate_execution(request("r4", "pro", 1, 60)).await;
        assert!(!resp.allowed);
        assert_eq!(resp.reason, "rate limit exceeded");
    }

    #[tokio::test]
    async fn overload_is_denied_with_system_overloaded() {
        let h = handler(100, 0);
        let resp = h.validate_execution(request("r1", "pro", 1, 60)).await;
        assert!(!resp.allowed);
        assert_eq!(resp.reason, "system overloaded");
    }
}
