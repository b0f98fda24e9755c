use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use crate::observability::Metrics;

/// Liveness probe router, bound on `http_port`.
pub fn health_router() -> Router {
    Router::new().route("/healthz", get(healthz))
}

/// Prometheus exposition router, bound on its own `metrics_port` — a
/// separate port from the health probe, isolating scrape traffic.
pub fn metrics_router(metrics: Metrics) -> Router {
    Router::new()
        .route("/metrics", get(metrics_endpoint))
        .with_state(metrics)
}

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn metrics_endpoint(State(metrics): State<Metrics>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics.render(),
    )
}
