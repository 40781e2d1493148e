//! Output encoding settings.

use serde::Serialize;

/// Output canvas width for resize-and-pad profiles.
pub const TARGET_WIDTH: u32 = 1080;
/// Output canvas height for resize-and-pad profiles.
pub const TARGET_HEIGHT: u32 = 1440;
/// JPEG quality used for every output.
pub const JPEG_QUALITY: u8 = 95;

/// Fixed-size canvas that resized images are centered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::new(TARGET_WIDTH, TARGET_HEIGHT)
    }
}

/// Conversion settings shared by every request.
///
/// Built once at startup and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConversionSettings {
    /// Canvas used by [`Transform::ResizeAndPad`](crate::Transform::ResizeAndPad)
    pub canvas: CanvasSize,
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            canvas: CanvasSize::default(),
            jpeg_quality: JPEG_QUALITY,
        }
    }
}
