//! API routes.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post, MethodRouter};
use axum::Router;
use jpegify_models::ConversionProfile;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::{
    convert_webp, convert_webp_resize, convert_zip, convert_zip_resize, health, index,
    resize_jpeg,
};
use crate::metrics::metrics_middleware;
use crate::middleware::{cors_layer, request_id, request_logging, security_headers};
use crate::state::AppState;

/// Register `handler` on `path` and on `path` without its trailing slash.
fn bind(router: Router<AppState>, path: &str, handler: MethodRouter<AppState>) -> Router<AppState> {
    let bare = path.trim_end_matches('/');
    if bare.is_empty() || bare == path {
        return router.route(path, handler);
    }
    router.route(path, handler.clone()).route(bare, handler)
}

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let conversion_routes = [
        (ConversionProfile::CONVERT_WEBP.path, post(convert_webp)),
        (ConversionProfile::CONVERT_ZIP.path, post(convert_zip)),
        (ConversionProfile::CONVERT_WEBP_RESIZE.path, post(convert_webp_resize)),
        (ConversionProfile::CONVERT_ZIP_RESIZE.path, post(convert_zip_resize)),
        (ConversionProfile::RESIZE_JPEG.path, post(resize_jpeg)),
    ]
    .into_iter()
    .fold(Router::new(), |router, (path, handler)| bind(router, path, handler))
    // Uploads are bounded by MAX_BODY_SIZE instead of axum's 2MB default
    .layer(DefaultBodyLimit::disable())
    .layer(RequestBodyLimitLayer::new(state.config.max_body_size));

    let info_routes = Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/healthz", get(health));

    // Metrics endpoint (if enabled)
    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .merge(conversion_routes)
        .merge(info_routes)
        .merge(metrics_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_logging))
        .layer(middleware::from_fn(request_id))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
