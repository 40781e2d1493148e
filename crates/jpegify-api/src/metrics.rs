//! Prometheus metrics for the API server.

use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::{Request, Response};
use axum::middleware::Next;
use jpegify_models::ProfileId;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "jpegify_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "jpegify_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "jpegify_http_requests_in_flight";

    // Conversion metrics
    pub const IMAGES_CONVERTED_TOTAL: &str = "jpegify_images_converted_total";
    pub const IMAGES_FAILED_TOTAL: &str = "jpegify_images_failed_total";
    pub const BATCHES_REJECTED_TOTAL: &str = "jpegify_batches_rejected_total";
    pub const BATCH_DURATION_SECONDS: &str = "jpegify_batch_duration_seconds";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a successful batch.
pub fn record_batch(profile: ProfileId, converted: usize, failed: usize, duration_secs: f64) {
    let labels = [("profile", profile.as_str())];
    counter!(names::IMAGES_CONVERTED_TOTAL, &labels).increment(converted as u64);
    counter!(names::IMAGES_FAILED_TOTAL, &labels).increment(failed as u64);
    histogram!(names::BATCH_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a batch that ended in a request-level error.
pub fn record_batch_rejected(profile: ProfileId) {
    let labels = [("profile", profile.as_str())];
    counter!(names::BATCHES_REJECTED_TOTAL, &labels).increment(1);
}

/// Route template for labels; unmatched paths collapse to one label.
fn route_label(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string())
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = route_label(&request);
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);
    // Also runs when the client disconnects and the future is dropped.
    let _in_flight = scopeguard::guard((), |_| {
        gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);
    });

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_label_falls_back_when_unmatched() {
        let request = Request::builder()
            .uri("/random/123")
            .body(Body::empty())
            .unwrap();
        assert_eq!(route_label(&request), "unmatched");
    }
}
