//! Error types for media operations.

use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while converting a batch.
#[derive(Debug, Error)]
pub enum MediaError {
    /// Request-level validation failure; the message is user-facing.
    #[error("{0}")]
    Rejected(String),

    /// Every item was rejected or failed; the message is user-facing.
    #[error("{0}")]
    NoValidFiles(String),

    #[error("Файл {name} не является ZIP архивом")]
    NotAnArchive { name: String },

    /// Decompressed contents went over the per-request extraction limit.
    #[error("Архив {name} слишком большой после распаковки")]
    ArchiveTooLarge { name: String },

    #[error("Invalid image geometry: {width}x{height}")]
    InvalidGeometry { width: u32, height: u32 },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    /// Whether the failure was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            MediaError::Rejected(_)
                | MediaError::NoValidFiles(_)
                | MediaError::NotAnArchive { .. }
                | MediaError::ArchiveTooLarge { .. }
        )
    }
}
