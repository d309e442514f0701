//! Export compositing: flatten the layout into one PNG.
//!
//! Export reads a snapshot of the layout plus the bitmap store and produces
//! a standalone artifact; it never mutates the model. The pipeline:
//!
//! 1. Bounding box over every placed image (empty layout is an error).
//! 2. A single global scale factor — 1 for display quality, otherwise the
//!    largest native-to-display width ratio across images, capped at
//!    [`MAX_SCALE_FACTOR`]. One shared scale keeps the composite geometry
//!    identical to the on-screen layout; sources are stretched to their
//!    scaled display boxes, not resampled at native size per image.
//! 3. An opaque white RGB surface sized to the scaled bounding box.
//! 4. Images painted in ascending z-index (stable on ties), each rotated
//!    about its own center.
//! 5. PNG encoding.
//!
//! The embedder must have registered every image's bitmap in the store
//! before exporting; a missing handle fails the export rather than hanging
//! on a load that may never finish.

mod blit;
mod png;

pub use png::{encode_png, EncodeError};

use thiserror::Error;

use crate::layout::{ImageId, Layout};
use crate::source::{Bitmap, BitmapStore};
use crate::OutputQuality;

use blit::Placement;

/// Filename suggested to the file-save collaborator.
pub const EXPORT_FILENAME: &str = "merged-image.png";

/// Cap on the global export scale factor, keeping worst-case surfaces sane.
pub const MAX_SCALE_FACTOR: f64 = 5.0;

/// Upper bound on the output surface's pixel buffer (RGB8 bytes).
const MAX_SURFACE_BYTES: u64 = 1 << 31;

/// Errors reported by the export pipeline.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Nothing to export.
    #[error("nothing to export: the layout is empty")]
    EmptyLayout,

    /// An image's bitmap was never registered in the store.
    #[error("bitmap for image {0} is not loaded")]
    SourceMissing(ImageId),

    /// The computed surface cannot be represented or allocated.
    #[error("output surface {width}x{height} exceeds the supported size")]
    SurfaceTooLarge { width: u64, height: u64 },

    /// PNG encoding failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// A finished export, ready for the file-save collaborator.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    /// PNG-encoded image data.
    pub bytes: Vec<u8>,
    /// Suggested download filename.
    pub filename: String,
}

/// Compute the global export scale factor.
///
/// Display quality always exports at 1:1. Original quality takes, per
/// image, the ratio of native width to current display width (1 when the
/// native size is unknown), keeps the maximum, and clamps it to
/// [`MAX_SCALE_FACTOR`] — the smallest shared scale that keeps the
/// least-downscaled image near its native resolution. An image displayed
/// above native size can pull the factor below 1; the maximum over all
/// images is taken verbatim.
pub fn scale_factor(layout: &Layout, quality: OutputQuality) -> f64 {
    match quality {
        OutputQuality::Display => 1.0,
        OutputQuality::Original => {
            let max_ratio = layout
                .images()
                .iter()
                .map(|img| match img.natural {
                    Some((natural_w, _)) if img.width > 0.0 => natural_w as f64 / img.width,
                    _ => 1.0,
                })
                .fold(f64::NEG_INFINITY, f64::max);
            if max_ratio.is_finite() {
                max_ratio.min(MAX_SCALE_FACTOR)
            } else {
                // Empty layout; the caller will reject it anyway
                1.0
            }
        }
    }
}

/// Flatten the layout into a single RGB surface.
///
/// # Errors
///
/// [`ExportError::EmptyLayout`] with no images,
/// [`ExportError::SourceMissing`] when a bitmap is absent from the store,
/// [`ExportError::SurfaceTooLarge`] when the scaled bounding box exceeds
/// the supported surface size.
pub fn compose(
    layout: &Layout,
    store: &BitmapStore,
    quality: OutputQuality,
) -> Result<Bitmap, ExportError> {
    let bounds = layout.bounding_box().ok_or(ExportError::EmptyLayout)?;
    let scale = scale_factor(layout, quality);

    // Round the surface up to whole pixels
    let width_px = (bounds.width() * scale).ceil();
    let height_px = (bounds.height() * scale).ceil();
    if !width_px.is_finite()
        || !height_px.is_finite()
        || width_px < 1.0
        || height_px < 1.0
        || width_px > u32::MAX as f64
        || height_px > u32::MAX as f64
    {
        return Err(ExportError::SurfaceTooLarge {
            width: width_px.max(0.0) as u64,
            height: height_px.max(0.0) as u64,
        });
    }
    let width = width_px as u32;
    let height = height_px as u32;
    if (width as u64) * (height as u64) * 3 > MAX_SURFACE_BYTES {
        return Err(ExportError::SurfaceTooLarge {
            width: width as u64,
            height: height as u64,
        });
    }

    // Opaque white background
    let mut surface = Bitmap::filled(width, height, [255, 255, 255]);

    for img in layout.paint_order() {
        let bitmap = store
            .get(img.source)
            .ok_or(ExportError::SourceMissing(img.id))?;

        let scaled_w = img.width * scale;
        let scaled_h = img.height * scale;
        blit::draw_into(
            &mut surface,
            bitmap,
            Placement {
                center_x: (img.x - bounds.min_x) * scale + scaled_w / 2.0,
                center_y: (img.y - bounds.min_y) * scale + scaled_h / 2.0,
                width: scaled_w,
                height: scaled_h,
                rotation: img.rotation,
            },
        );
    }

    Ok(surface)
}

/// Flatten the layout and encode it as a PNG download artifact.
pub fn export_png(
    layout: &Layout,
    store: &BitmapStore,
    quality: OutputQuality,
) -> Result<ExportArtifact, ExportError> {
    let surface = compose(layout, store, quality)?;
    let bytes = encode_png(&surface.pixels, surface.width, surface.height)?;
    Ok(ExportArtifact {
        bytes,
        filename: EXPORT_FILENAME.to_string(),
    })
}
