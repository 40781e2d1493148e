//! Image conversion and archive packaging.
//!
//! This crate provides:
//! - Proportional resize-and-pad onto a fixed canvas
//! - Decode / RGB / JPEG re-encode of a single item
//! - ZIP extraction into scoped temporary storage and result archive writing
//! - The profile-driven batch converter used by every endpoint

pub mod archive;
pub mod batch;
pub mod error;
pub mod resize;
pub mod transcode;

pub use archive::{extract_archive, scan_matching, write_result_archive};
pub use batch::{BatchConverter, DEFAULT_MAX_EXTRACTED_BYTES};
pub use error::{MediaError, MediaResult};
pub use resize::resize_and_pad;
pub use transcode::transcode;
