use tonic::{Request, Status};
use uuid::Uuid;

/// Trace id attached to a request's extensions by [`trace_interceptor`].
#[derive(Clone)]
pub struct TraceId(pub String);

/// Unary interceptor assigning/propagating a trace id and logging the
/// inbound call, grounded on the original control plane's
/// `UnaryInterceptor`. Latency and status-code metrics are recorded in
/// [`crate::grpc::AdmissionGrpcService`] itself, since a `tonic`
/// interceptor only sees the request on the way in, never the eventual
/// response.
pub fn trace_interceptor(mut request: Request<()>) -> Result<Request<()>, Status> {
    let trace_id = request
        .metadata()
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    tracing::info!(trace_id = %trace_id, "received ValidateExecution call");
    request.extensions_mut().insert(TraceId(trace_id));
    Ok(request)
}
