//! API configuration.

use std::path::PathBuf;

use jpegify_media::DEFAULT_MAX_EXTRACTED_BYTES;
use jpegify_models::ConversionSettings;

/// Default request body limit (256 MiB); archives of photos are large.
const DEFAULT_MAX_BODY_SIZE: usize = 256 * 1024 * 1024;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins (`*` mirrors any origin)
    pub cors_origins: Vec<String>,
    /// Max request body size
    pub max_body_size: usize,
    /// Max decompressed bytes extracted from archives per request
    pub max_extracted_size: u64,
    /// Environment (development/production)
    pub environment: String,
    /// Parent for per-request temporary directories (system default if unset)
    pub temp_dir: Option<PathBuf>,
    /// Fixed conversion constants, not read from the environment
    pub conversion: ConversionSettings,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            max_extracted_size: DEFAULT_MAX_EXTRACTED_BYTES,
            environment: "development".to_string(),
            temp_dir: None,
            conversion: ConversionSettings::default(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8000),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| parse_origins(&s))
                .unwrap_or_else(|_| vec!["*".to_string()]),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_BODY_SIZE),
            max_extracted_size: std::env::var("MAX_EXTRACTED_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_EXTRACTED_BYTES),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            temp_dir: std::env::var("TEMP_DIR")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            conversion: ConversionSettings::default(),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        is_production_env(&self.environment)
    }
}

/// Whether an `ENVIRONMENT` value names production, ignoring case.
pub fn is_production_env(environment: &str) -> bool {
    environment.trim().eq_ignore_ascii_case("production")
}

/// Split a comma-separated origin list, falling back to `*` when empty.
fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if origins.is_empty() {
        vec!["*".to_string()]
    } else {
        origins
    }
}
