//! Application state.

use std::sync::Arc;

use jpegify_media::BatchConverter;

use crate::config::ApiConfig;

/// Shared application state.
///
/// Immutable after startup; requests only read from it.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ApiConfig>,
    pub converter: Arc<BatchConverter>,
}

impl AppState {
    /// Create new application state.
    pub fn new(config: ApiConfig) -> Self {
        let mut converter = BatchConverter::new(config.conversion)
            .with_extraction_limit(config.max_extracted_size);
        if let Some(dir) = &config.temp_dir {
            converter = converter.with_temp_root(dir);
        }

        Self {
            config: Arc::new(config),
            converter: Arc::new(converter),
        }
    }
}
