use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, Encoder, HistogramVec, IntCounter,
    IntCounterVec, TextEncoder,
};

// Prometheus metrics (default registry)
pub static UPSTREAM_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "campus_gateway_upstream_requests_total",
        "Requests sent to backing services",
        &["upstream"]
    )
    .expect("register upstream_requests_total")
});

pub static UPSTREAM_ERRORS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "campus_gateway_upstream_errors_total",
        "Upstream calls that failed in transport or returned a non-success status",
        &["upstream", "kind"]
    )
    .expect("register upstream_errors_total")
});

pub static AGGREGATION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "campus_gateway_aggregation_duration_seconds",
        "Time to assemble a details view",
        &["view"],
        vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .expect("register aggregation_duration")
});

pub static CAPACITY_MIRROR_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "campus_gateway_capacity_mirror_failures_total",
        "Capacity updates the enrollment service did not receive"
    )
    .expect("register capacity_mirror_failures_total")
});

pub static CASCADE_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "campus_gateway_cascade_failures_total",
        "Enrollment purges that failed after a student or course delete"
    )
    .expect("register cascade_failures_total")
});

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_counters_are_exported() {
        CAPACITY_MIRROR_FAILURES_TOTAL.inc_by(0);
        CASCADE_FAILURES_TOTAL.inc_by(0);
        let (status, body) = encode_metrics();
        assert_eq!(status, axum::http::StatusCode::OK);
        assert!(body.contains("campus_gateway_capacity_mirror_failures_total"));
        assert!(body.contains("campus_gateway_cascade_failures_total"));
    }
}
