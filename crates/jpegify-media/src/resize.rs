//! Proportional resize onto a fixed white canvas.

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use jpegify_models::CanvasSize;

use crate::error::{MediaError, MediaResult};

/// Canvas background.
const PAD_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Dimensions of `width`x`height` shrunk to fit inside `canvas`.
///
/// Never upscales. Dimensions are rounded down but never reach zero.
pub fn fit_within(width: u32, height: u32, canvas: CanvasSize) -> MediaResult<(u32, u32)> {
    if width == 0 || height == 0 {
        return Err(MediaError::InvalidGeometry { width, height });
    }
    if canvas.width == 0 || canvas.height == 0 {
        return Err(MediaError::InvalidGeometry {
            width: canvas.width,
            height: canvas.height,
        });
    }
    if width <= canvas.width && height <= canvas.height {
        return Ok((width, height));
    }

    // Integer comparison of cw/w against ch/h avoids float truncation
    // turning an exact fit like 1440.0 into 1439.
    let (w, h) = (u64::from(width), u64::from(height));
    let (cw, ch) = (u64::from(canvas.width), u64::from(canvas.height));

    if cw * h <= ch * w {
        let scaled_h = ((h * cw) / w).max(1) as u32;
        Ok((canvas.width, scaled_h))
    } else {
        let scaled_w = ((w * ch) / h).max(1) as u32;
        Ok((scaled_w, canvas.height))
    }
}

/// Shrink `image` to fit `canvas` and center it on an opaque white background.
///
/// The result is always exactly `canvas.width` x `canvas.height`. An image that
/// already has the canvas dimensions is returned untouched.
pub fn resize_and_pad(image: RgbImage, canvas: CanvasSize) -> MediaResult<RgbImage> {
    let (src_w, src_h) = image.dimensions();
    let (w, h) = fit_within(src_w, src_h, canvas)?;

    let scaled = if (w, h) == (src_w, src_h) {
        image
    } else {
        imageops::resize(&image, w, h, FilterType::Lanczos3)
    };

    if (w, h) == (canvas.width, canvas.height) {
        return Ok(scaled);
    }

    let mut padded = RgbImage::from_pixel(canvas.width, canvas.height, PAD_COLOR);
    let left = (canvas.width - w) / 2;
    let top = (canvas.height - h) / 2;
    imageops::overlay(&mut padded, &scaled, i64::from(left), i64::from(top));

    Ok(padded)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb<u8> = Rgb([255, 0, 0]);
    const SMALL_CANVAS: CanvasSize = CanvasSize::new(108, 144);

    fn solid(width: u32, height: u32, color: Rgb<u8>) -> RgbImage {
        RgbImage::from_pixel(width, height, color)
    }

    fn is_reddish(px: &Rgb<u8>) -> bool {
        px[0] > 240 && px[1] < 16 && px[2] < 16
    }

    #[test]
    fn test_fit_within_exact_ratio() {
        let canvas = CanvasSize::default();
        assert_eq!(fit_within(2160, 2880, canvas).unwrap(), (1080, 1440));
        assert_eq!(fit_within(1080, 1440, canvas).unwrap(), (1080, 1440));
    }

    #[test]
    fn test_fit_within_limits_by_tighter_axis() {
        let canvas = CanvasSize::default();
        // Tall: height-limited
        assert_eq!(fit_within(1000, 3000, canvas).unwrap(), (480, 1440));
        // Wide: width-limited, 1080 * 1000 / 4000 = 270
        assert_eq!(fit_within(4000, 1000, canvas).unwrap(), (1080, 270));
    }

    #[test]
    fn test_fit_within_never_upscales() {
        let canvas = CanvasSize::default();
        assert_eq!(fit_within(200, 300, canvas).unwrap(), (200, 300));
    }

    #[test]
    fn test_fit_within_never_reaches_zero() {
        let canvas = CanvasSize::default();
        assert_eq!(fit_within(100_000, 1, canvas).unwrap(), (1080, 1));
    }

    #[test]
    fn test_zero_sized_source_is_rejected() {
        let err = resize_and_pad(RgbImage::new(0, 10), SMALL_CANVAS).unwrap_err();
        assert!(matches!(err, MediaError::InvalidGeometry { width: 0, height: 10 }));
    }

    #[test]
    fn test_downscale_and_center() {
        // 200x300 -> scale 0.48 -> 96x144, left offset 6
        let out = resize_and_pad(solid(200, 300, RED), SMALL_CANVAS).unwrap();
        assert_eq!(out.dimensions(), (108, 144));

        assert_eq!(*out.get_pixel(0, 0), PAD_COLOR);
        assert_eq!(*out.get_pixel(3, 72), PAD_COLOR);
        assert_eq!(*out.get_pixel(104, 72), PAD_COLOR);
        assert!(is_reddish(out.get_pixel(54, 72)));
        assert!(is_reddish(out.get_pixel(54, 0)));
    }

    #[test]
    fn test_small_source_is_centered_not_stretched() {
        let out = resize_and_pad(solid(20, 30, RED), SMALL_CANVAS).unwrap();
        assert_eq!(out.dimensions(), (108, 144));

        // Offsets (44, 57), image occupies x 44..64, y 57..87
        assert_eq!(*out.get_pixel(44, 57), RED);
        assert_eq!(*out.get_pixel(63, 86), RED);
        assert_eq!(*out.get_pixel(43, 57), PAD_COLOR);
        assert_eq!(*out.get_pixel(64, 86), PAD_COLOR);
        assert_eq!(*out.get_pixel(44, 56), PAD_COLOR);
        assert_eq!(*out.get_pixel(44, 87), PAD_COLOR);
    }

    #[test]
    fn test_wide_source_is_padded_vertically() {
        // 400x100 -> 108x27, top offset (144 - 27) / 2 = 58
        let out = resize_and_pad(solid(400, 100, RED), SMALL_CANVAS).unwrap();
        assert_eq!(*out.get_pixel(54, 57), PAD_COLOR);
        assert!(is_reddish(out.get_pixel(54, 58)));
        assert!(is_reddish(out.get_pixel(54, 84)));
        assert_eq!(*out.get_pixel(54, 85), PAD_COLOR);
    }

    #[test]
    fn test_matching_size_is_untouched() {
        let blue = Rgb([0, 0, 255]);
        let src = solid(108, 144, blue);
        let out = resize_and_pad(src.clone(), SMALL_CANVAS).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn test_idempotent() {
        let once = resize_and_pad(solid(300, 120, RED), SMALL_CANVAS).unwrap();
        let twice = resize_and_pad(once.clone(), SMALL_CANVAS).unwrap();
        assert_eq!(once, twice);
    }
}
