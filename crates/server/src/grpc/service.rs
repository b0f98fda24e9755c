use std::sync::Arc;

use tonic::{Request, Response, Status};
use tracing::Instrument;

use admission_core::{ExecutionRequest as CoreRequest, OrgId, RequestId};

use crate::grpc::interceptor::TraceId;
use crate::handler::{AdmissionHandler, DEADLINE};

/// Generated protobuf types and the `tonic` service trait, compiled from
/// `proto/admission.proto` by `build.rs`.
pub mod pb {
    tonic::include_proto!("admission.v1");
}

use pb::admission_service_server::AdmissionService;
use pb::{ExecutionRequest, ExecutionResponse};

/// `tonic` service adapter. Translates between the wire messages and the
/// transport-independent core types, enforces the pipeline deadline, and
/// turns unexpected panics/timeouts into a generic internal RPC error
/// (denials themselves are never RPC errors).
pub struct AdmissionGrpcService {
    handler: Arc<AdmissionHandler>,
}

impl AdmissionGrpcService {
    #[must_use]
    pub fn new(handler: Arc<AdmissionHandler>) -> Self {
        Self { handler }
    }
}

#[tonic::async_trait]
impl AdmissionService for AdmissionGrpcService {
    async fn validate_execution(
        &self,
        request: Request<ExecutionRequest>,
    ) -> Result<Response<ExecutionResponse>, Status> {
        let trace_id = request
            .extensions()
            .get::<TraceId>()
            .map(|t| t.0.clone())
            .unwrap_or_default();

        let wire = request.into_inner();
        let core_request = CoreRequest {
            request_id: RequestId::new(wire.request_id),
            org_id: OrgId::new(wire.org_id),
            users: wire.users,
            duration: wire.duration_seconds,
        };

        // Run the pipeline on its own task so a programmer fault (an
        // unexpected panic) surfaces as a `JoinError` here rather than
        // unwinding into the connection and dropping the call silently.
        // Internal faults are caught, logged with a dedicated counter, and
        // returned as a generic internal error without leaking the cause.
        //
        // The task is instrumented with a span carrying `trace_id`, so every
        // log emitted while the pipeline runs — including deep inside
        // `AdmissionHandler`, e.g. the rate-limiter backend-error warning —
        // is tagged with it too, not just this function's own log lines.
        let handler = Arc::clone(&self.handler);
        let span = tracing::info_span!("validate_execution", trace_id = %trace_id);
        let mut task = tokio::spawn(
            async move { handler.validate_execution(core_request).await }.instrument(span),
        );

        match tokio::time::timeout(DEADLINE, &mut task).await {
            Ok(Ok(response)) => {
                tracing::info!(trace_id = %trace_id, allowed = response.allowed, "validate_execution completed");
                Ok(Response::new(ExecutionResponse {
                    allowed: response.allowed,
                    reason: response.reason,
                }))
            }
            Ok(Err(join_err)) => {
                metrics::counter!("admission_internal_faults_total").increment(1);
                tracing::error!(trace_id = %trace_id, error = %join_err, "admission handler task failed");
                Err(Status::internal("internal error"))
            }
            Err(_elapsed) => {
                // The timeout elapsing only stops *this* future from waiting
                // on the `JoinHandle` — it does not cancel the spawned task.
                // Abort it explicitly so the pipeline doesn't keep running
                // to completion (rate limiter, idempotency mark, audit)
                // after the client has already been told the call failed.
                task.abort();
                metrics::counter!(
                    "admission_requests_total",
                    "method" => "ValidateExecution",
                    "status" => "deadline_exceeded"
                )
                .increment(1);
                tracing::warn!(trace_id = %trace_id, "admission pipeline deadline exceeded, task aborted");
                Err(Status::deadline_exceeded("admission pipeline deadline exceeded"))
            }
        }
    }
}
