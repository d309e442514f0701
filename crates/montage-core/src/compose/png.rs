//! PNG encoding for export.
//!
//! The flattened surface leaves the compositor as PNG bytes via the `image`
//! crate's PNG encoder. PNG is lossless, so unlike the usual JPEG export
//! path there is no quality knob — the only failure modes are malformed
//! input buffers and encoder errors.

use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;
use thiserror::Error;

/// Errors that can occur during PNG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// PNG encoding failed
    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Encode RGB pixel data to PNG bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
///
/// # Returns
///
/// PNG-encoded bytes on success, or an error if encoding fails.
///
/// # Example
///
/// ```ignore
/// let pixels = vec![255u8; 100 * 100 * 3]; // White image
/// let png = encode_png(&pixels, 100, 100).unwrap();
/// assert_eq!(&png[0..4], &[0x89, b'P', b'N', b'G']);
/// ```
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    // Validate dimensions
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    // Validate pixel data length
    let expected_len = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    let mut buffer = Cursor::new(Vec::new());
    let encoder = PngEncoder::new(&mut buffer);

    encoder
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

    #[test]
    fn test_encode_png_basic() {
        let width = 100;
        let height = 100;
        let pixels = vec![128u8; width * height * 3];

        let png_bytes = encode_png(&pixels, width as u32, height as u32).unwrap();
        assert_eq!(&png_bytes[0..8], &PNG_MAGIC);
    }

    #[test]
    fn test_encode_png_round_trip() {
        // PNG is lossless: decoding must give the pixels back exactly
        let width = 16u32;
        let height = 8u32;
        let pixels: Vec<u8> = (0..(width * height * 3)).map(|i| (i % 251) as u8).collect();

        let png_bytes = encode_png(&pixels, width, height).unwrap();
        let decoded = image::load_from_memory(&png_bytes).unwrap().into_rgb8();

        assert_eq!(decoded.dimensions(), (width, height));
        assert_eq!(decoded.into_raw(), pixels);
    }

    #[test]
    fn test_encode_png_invalid_pixel_data_short() {
        let pixels = vec![128u8; 99 * 100 * 3]; // One row short

        let result = encode_png(&pixels, 100, 100);
        assert!(matches!(result, Err(EncodeError::InvalidPixelData { .. })));
    }

    #[test]
    fn test_encode_png_invalid_pixel_data_long() {
        let pixels = vec![128u8; 101 * 100 * 3]; // One row extra

        let result = encode_png(&pixels, 100, 100);
        assert!(matches!(result, Err(EncodeError::InvalidPixelData { .. })));
    }

    #[test]
    fn test_encode_png_zero_width() {
        let result = encode_png(&[], 0, 100);
        assert!(matches!(result, Err(EncodeError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_encode_png_zero_height() {
        let result = encode_png(&[], 100, 0);
        assert!(matches!(result, Err(EncodeError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_encode_png_small_image() {
        // 1x1 pixel image
        let pixels = vec![255, 0, 0]; // Red pixel

        let png_bytes = encode_png(&pixels, 1, 1).unwrap();
        assert_eq!(&png_bytes[0..8], &PNG_MAGIC);
    }

    #[test]
    fn test_encode_png_non_square() {
        // Wide image
        let pixels = vec![128u8; 200 * 50 * 3];
        assert!(encode_png(&pixels, 200, 50).is_ok());

        // Tall image
        let pixels = vec![128u8; 50 * 200 * 3];
        assert!(encode_png(&pixels, 50, 200).is_ok());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
