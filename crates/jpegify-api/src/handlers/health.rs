//! Informational handlers.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use jpegify_models::{ConversionSettings, ProfileId, SourceMode, Transform};
use serde::Serialize;

use crate::state::AppState;

const INDEX_MESSAGE: &str = "API для конвертации WebP в JPEG и изменения размера JPEG. \
Поддерживает 5 операций: конвертация WebP, конвертация WebP из ZIP, конвертация WebP \
с изменением размера, конвертация WebP из ZIP с изменением размера, изменение размера JPEG.";

/// Root response.
#[derive(Serialize)]
pub struct IndexResponse {
    pub message: &'static str,
    /// Canvas and JPEG quality applied to every output
    pub settings: ConversionSettings,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: &'static str,
    pub operation: ProfileId,
    pub accepts: Vec<&'static str>,
    pub source: SourceMode,
    pub transform: Transform,
}

/// `GET /` - description of the service and its output settings.
pub async fn index(State(state): State<AppState>) -> Json<IndexResponse> {
    let endpoints = ProfileId::ALL
        .iter()
        .map(|id| {
            let profile = id.profile();
            let accepts = match profile.source {
                SourceMode::Direct => profile.accepted.extensions().to_vec(),
                SourceMode::Archive => vec!["zip"],
                SourceMode::Mixed => {
                    let mut accepts = profile.accepted.extensions().to_vec();
                    accepts.push("zip");
                    accepts
                }
            };
            EndpointInfo {
                path: profile.path,
                operation: *id,
                accepts,
                source: profile.source,
                transform: profile.transform,
            }
        })
        .collect();

    Json(IndexResponse {
        message: INDEX_MESSAGE,
        settings: state.config.conversion,
        endpoints,
    })
}

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Health check endpoint (liveness probe).
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
