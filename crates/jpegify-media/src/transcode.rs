//! Single-item transcoding to JPEG.

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, RgbImage};
use jpegify_models::{ConversionSettings, Transform};

use crate::error::MediaResult;
use crate::resize::resize_and_pad;

/// An encoded JPEG and its pixel dimensions.
#[derive(Debug, Clone)]
pub struct EncodedJpeg {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Decode `bytes`, flatten to RGB, apply `transform` and encode as JPEG.
///
/// The input format is sniffed from the content, not the file name. Alpha is
/// dropped by the RGB conversion, not blended against the pad color.
pub fn transcode(
    bytes: &[u8],
    transform: Transform,
    settings: &ConversionSettings,
) -> MediaResult<EncodedJpeg> {
    let rgb = image::load_from_memory(bytes)?.to_rgb8();

    let rgb = match transform {
        Transform::Identity => rgb,
        Transform::ResizeAndPad => resize_and_pad(rgb, settings.canvas)?,
    };

    encode_jpeg(&rgb, settings.jpeg_quality)
}

/// Encode an RGB buffer as baseline JPEG.
pub fn encode_jpeg(rgb: &RgbImage, quality: u8) -> MediaResult<EncodedJpeg> {
    let (width, height) = rgb.dimensions();
    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
    encoder.encode(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)?;

    Ok(EncodedJpeg {
        bytes,
        width,
        height,
    })
}
