//! End-to-end scenarios for the full admission pipeline, assembled the way
//! `main.rs` assembles it but against the in-memory backend (the redis
//! backend's conformance suite is integration-only; see
//! `admission-state-redis`).

use std::sync::Arc;
use std::time::Duration;

use admission_audit::AuditSink;
use admission_core::{ExecutionRequest, OrgId, RequestId};
use admission_policy::PolicyEngine;
use admission_server::handler::AdmissionHandler;
use admission_shed::Shedder;
use admission_state::StateStore;
use admission_state_memory::MemoryStateStore;

fn request(id: &str, org: &str, users: u32, duration: u32) -> ExecutionRequest {
    ExecutionRequest {
        request_id: RequestId::new(id),
        org_id: OrgId::new(org),
        users,
        duration,
    }
}

fn default_handler() -> AdmissionHandler {
    let store: Arc<dyn StateStore> = Arc::new(MemoryStateStore::default());
    AdmissionHandler::new(
        store,
        Shedder::new(500),
        PolicyEngine::default_engine(),
        AuditSink::spawn().0,
        100,
        Duration::from_secs(60),
    )
}

#[tokio::test]
async fn s1_well_formed_request_is_allowed() {
    let handler = default_handler();
    let resp = handler
        .validate_execution(request("r1", "pro", 10, 600))
        .await;
    assert!(resp.allowed);
    assert!(resp.reason.is_empty());
}

#[tokio::test]
async fn s2_repeated_request_id_does_not_consume_the_rate_limit_again() {
    let handler = AdmissionHandler::new(
        Arc::new(MemoryStateStore::default()) as Arc<dyn StateStore>,
        Shedder::new(500),
        PolicyEngine::default_engine(),
        AuditSink::spawn().0,
        1,
        Duration::from_secs(60),
    );

    let first = handler
        .validate_execution(request("r1", "pro", 10, 600))
        .await;
    assert!(first.allowed);

    // The window's single slot is now used; a *new* request id would be
    // denied, but repeating r1 must short-circuit on idempotency instead.
    let repeat = handler
        .validate_execution(request("r1", "pro", 10, 600))
        .await;
    assert!(repeat.allowed);

    let other = handler
        .validate_execution(request("r2", "pro", 10, 600))
        .await;
    assert!(!other.allowed);
    assert_eq!(other.reason, "rate limit exceeded");
}

#[tokio::test]
async fn s3_quota_violation_is_denied() {
    let handler = default_handler();
    let resp = handler
        .validate_execution(request("r2", "free-tier", 2000, 60))
        .await;
    assert!(!resp.allowed);
    assert_eq!(resp.reason, "organization quota exceeded");
}

#[tokio::test]
async fn s4_duration_violation_is_denied() {
    let handler = default_handler();
    let resp = handler
        .validate_execution(request("r3", "pro", 10, 7200))
        .await;
    assert!(!resp.allowed);
    assert_eq!(resp.reason, "duration limit exceeded");
}

#[tokio::test]
async fn s5_rate_limit_ceiling_across_101_distinct_ids() {
    let handler = default_handler();
    for i in 0..100 {
        let resp = handler
            .validate_execution(request(&format!("id-{i}"), "pro", 10, 60))
            .await;
        assert!(resp.allowed, "request {i} should be admitted");
    }
    let resp = handler
        .validate_execution(request("id-100", "pro", 10, 60))
        .await;
    assert!(!resp.allowed);
    assert_eq!(resp.reason, "rate limit exceeded");
}

/// A store wrapper that stalls every `get` call, used to hold a handler
/// task inside its single suspension point so concurrent arrivals can
/// race the shedder.
struct StallingStore {
    inner: Arc<dyn StateStore>,
    stall: Duration,
}

#[async_trait::async_trait]
impl StateStore for StallingStore {
    async fn get(&self, key: &str) -> Option<String> {
        tokio::time::sleep(self.stall).await;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) {
        self.inner.set(key, value).await;
    }

    async fn acquire(&self, key: &str, limit: i64) -> Result<bool, admission_state::StateError> {
        self.inner.acquire(key, limit).await
    }

    async fn release(&self, key: &str) -> Result<(), admission_state::StateError> {
        self.inner.release(key).await
    }

    async fn fixed_window_allow(
        &self,
        key: &str,
        limit: i64,
        window_secs: u64,
    ) -> Result<bool, admission_state::StateError> {
        self.inner.fixed_window_allow(key, limit, window_secs).await
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn s6_shedder_rejects_exactly_one_of_three_under_max_inflight_two() {
    let store: Arc<dyn StateStore> = Arc::new(StallingStore {
        inner: Arc::new(MemoryStateStore::default()),
        stall: Duration::from_millis(200),
    });

    let handler = Arc::new(AdmissionHandler::new(
        store,
        Shedder::new(2),
        PolicyEngine::default_engine(),
        AuditSink::spawn().0,
        100,
        Duration::from_secs(60),
    ));

    let mut tasks = Vec::new();
    for i in 0..3 {
        let handler = Arc::clone(&handler);
        tasks.push(tokio::spawn(async move {
            handler
                .validate_execution(request(&format!("concurrent-{i}"), "pro", 10, 60))
                .await
        }));
    }

    let mut overloaded = 0;
    let mut completed = 0;
    for task in tasks {
        let resp = task.await.unwrap();
        if !resp.allowed && resp.reason == "system overloaded" {
            overloaded += 1;
        } else {
            completed += 1;
        }
    }

    assert_eq!(overloaded, 1, "exactly one of three should be shed");
    assert_eq!(completed, 2);
}

/// Exercises the cancellation path through the gRPC adapter itself (the
/// only layer that knows how to abort the handler's task), not just the
/// bare `AdmissionHandler`: a stalled store call blows through the
/// pipeline deadline, the RPC returns `DeadlineExceeded`, and the
/// in-flight task must actually be aborted rather than merely detached —
/// its shedder slot is released and it never reaches the idempotency
/// mark step.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn deadline_exceeded_aborts_the_task_and_releases_its_slot() {
    use admission_server::grpc::pb::admission_service_server::AdmissionService;
    use admission_server::grpc::pb::ExecutionRequest as WireRequest;
    use admission_server::grpc::AdmissionGrpcService;
    use admission_server::handler::DEADLINE;
    use admission_state::key::idem_key;

    let backing: Arc<dyn StateStore> = Arc::new(MemoryStateStore::default());
    let store: Arc<dyn StateStore> = Arc::new(StallingStore {
        inner: Arc::clone(&backing),
        stall: DEADLINE + Duration::from_secs(1),
    });

    let handler = Arc::new(AdmissionHandler::new(
        store,
        Shedder::new(1),
        PolicyEngine::default_engine(),
        AuditSink::spawn().0,
        100,
        Duration::from_secs(60),
    ));
    let service = AdmissionGrpcService::new(Arc::clone(&handler));

    let wire = WireRequest {
        request_id: "cancelled-1".to_owned(),
        org_id: "pro".to_owned(),
        users: 10,
        duration_seconds: 60,
    };

    let result = service.validate_execution(tonic::Request::new(wire)).await;
    let status = result.expect_err("a stalled call should fail with deadline exceeded");
    assert_eq!(status.code(), tonic::Code::DeadlineExceeded);

    // `abort()` only requests cancellation; give the runtime a moment to
    // actually drop the task's future (and with it, the shedder guard).
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(
        handler.inflight(),
        0,
        "the aborted task must release its shedder slot"
    );
    assert!(
        backing
            .get(&idem_key(&RequestId::new("cancelled-1")))
            .await
            .is_none(),
        "a cancelled request must never be marked idempotent"
    );
}
