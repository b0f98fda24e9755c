use metrics::{describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Histogram bucket boundaries for the handler's request duration metric.
const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 5.0,
];

/// Thin handle around the global metrics recorder.
///
/// After [`Metrics::install`] the `metrics` crate macros (`counter!`,
/// `histogram!`) are usable anywhere in the binary. The `PrometheusHandle`
/// is retained only to render the `/metrics` endpoint.
#[derive(Clone)]
pub struct Metrics {
    handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder and describe every metric
    /// this service exposes. Must run once, before the gRPC server starts
    /// accepting requests.
    pub fn install() -> Self {
        let handle = PrometheusBuilder::new()
            .set_buckets_for_metric(
                metrics_exporter_prometheus::Matcher::Full(
                    "admission_request_duration_seconds".to_string(),
                ),
                LATENCY_BUCKETS,
            )
            .expect("valid matcher")
            .install_recorder()
            .expect("failed to install metrics recorder");

        describe_counter!(
            "admission_requests_total",
            Unit::Count,
            "Total ValidateExecution calls, labeled by method and status"
        );
        describe_histogram!(
            "admission_request_duration_seconds",
            Unit::Seconds,
            "ValidateExecution handler latency"
        );
        describe_counter!(
            "admission_policy_denied_total",
            Unit::Count,
            "Denials, labeled by reason (overload, ratelimit, policy)"
        );
        describe_counter!(
            "admission_internal_faults_total",
            Unit::Count,
            "Unexpected internal faults caught at the RPC boundary"
        );

        Self { handle }
    }

    /// Render all metrics in Prometheus text exposition format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}
