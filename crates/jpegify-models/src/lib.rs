//! Shared data models for the Jpegify service.
//!
//! This crate provides:
//! - Fixed conversion settings (canvas size, JPEG quality)
//! - The endpoint conversion profiles
//! - Per-request item and outcome types

pub mod encoding;
pub mod item;
pub mod profile;
pub mod utils;

// Re-export common types
pub use encoding::{CanvasSize, ConversionSettings};
pub use item::{BatchReport, ConvertedImage, InputItem, ItemFailure, ItemOutcome};
pub use profile::{AcceptedKind, ConversionProfile, ProfileId, SourceMode, Transform};
pub use utils::{file_stem, has_extension, is_zip_name};
