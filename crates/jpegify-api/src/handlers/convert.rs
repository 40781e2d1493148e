//! Conversion handlers.
//!
//! Each endpoint is a thin binding of one [`ConversionProfile`] onto the
//! shared batch converter.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use jpegify_models::{BatchReport, ConversionProfile};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;
use crate::upload::read_uploads;

type Upload = Result<Multipart, MultipartRejection>;

/// `POST /convert-webp/` - WebP files to JPEG.
pub async fn convert_webp(State(state): State<AppState>, multipart: Upload) -> ApiResult<Response> {
    run_profile(&state, &ConversionProfile::CONVERT_WEBP, multipart).await
}

/// `POST /convert-zip/` - WebP files inside one ZIP to JPEG.
pub async fn convert_zip(State(state): State<AppState>, multipart: Upload) -> ApiResult<Response> {
    run_profile(&state, &ConversionProfile::CONVERT_ZIP, multipart).await
}

/// `POST /convert-webp-resize/` - WebP files to padded 1080x1440 JPEG.
pub async fn convert_webp_resize(
    State(state): State<AppState>,
    multipart: Upload,
) -> ApiResult<Response> {
    run_profile(&state, &ConversionProfile::CONVERT_WEBP_RESIZE, multipart).await
}

/// `POST /convert-zip-resize/` - WebP files inside one ZIP to padded JPEG.
pub async fn convert_zip_resize(
    State(state): State<AppState>,
    multipart: Upload,
) -> ApiResult<Response> {
    run_profile(&state, &ConversionProfile::CONVERT_ZIP_RESIZE, multipart).await
}

/// `POST /resize-jpeg/` - JPEG files and ZIPs of JPEGs to padded JPEG.
pub async fn resize_jpeg(State(state): State<AppState>, multipart: Upload) -> ApiResult<Response> {
    run_profile(&state, &ConversionProfile::RESIZE_JPEG, multipart).await
}

async fn run_profile(
    state: &AppState,
    profile: &'static ConversionProfile,
    multipart: Upload,
) -> ApiResult<Response> {
    let uploads = read_uploads(multipart).await?;
    let converter = Arc::clone(&state.converter);
    let start = Instant::now();

    // Decode/encode is CPU-bound; keep it off the async workers.
    let result = tokio::task::spawn_blocking(move || converter.convert(profile, uploads))
        .await
        .map_err(|e| ApiError::internal(format!("Conversion task failed: {}", e)))?;

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            metrics::record_batch_rejected(profile.id);
            return Err(e.into());
        }
    };

    metrics::record_batch(
        profile.id,
        report.converted(),
        report.failures.len(),
        start.elapsed().as_secs_f64(),
    );

    Ok(zip_response(report))
}

fn zip_response(report: BatchReport) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", report.archive_name),
            ),
        ],
        report.archive,
    )
        .into_response()
}
