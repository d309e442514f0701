//! Rotated, stretched drawing of one bitmap onto the output surface.
//!
//! The compositor paints each placed image by inverse mapping: for every
//! surface pixel inside the rotated destination box, find the source pixel
//! that lands there and bilinearly interpolate it. Stretch (display box to
//! source resolution) and rotation are folded into a single inverse
//! transform, so each painted pixel is resampled exactly once.
//!
//! For rotation by angle θ (clockwise on screen, matching the y-down canvas
//! coordinate system), the inverse transform of a destination offset from
//! the box center is:
//! ```text
//! u =  dx * cos(θ) + dy * sin(θ)
//! v = -dx * sin(θ) + dy * cos(θ)
//! ```
//! Pixels whose (u, v) falls outside the unrotated box are left untouched,
//! which is what keeps the surface background visible around rotated
//! corners.

use crate::source::Bitmap;

/// Destination placement of one image on the surface.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Placement {
    /// Center of the destination box, surface pixels.
    pub center_x: f64,
    pub center_y: f64,
    /// Size of the destination box (display size times export scale).
    pub width: f64,
    pub height: f64,
    /// Clockwise rotation about the box center, degrees.
    pub rotation: f64,
}

/// Draw `src` stretched to the placement box and rotated about its center.
///
/// Surface pixels outside the box keep their existing color. Degenerate
/// placements (empty source, non-positive box) draw nothing.
pub(crate) fn draw_into(surface: &mut Bitmap, src: &Bitmap, placement: Placement) {
    if src.is_empty() || placement.width <= 0.0 || placement.height <= 0.0 {
        return;
    }

    let angle_rad = placement.rotation.to_radians();
    let cos = angle_rad.cos();
    let sin = angle_rad.sin();

    let half_w = placement.width / 2.0;
    let half_h = placement.height / 2.0;

    // Surface-space bounding box of the rotated destination rectangle,
    // clamped to the surface.
    let extent_x = half_w * cos.abs() + half_h * sin.abs();
    let extent_y = half_w * sin.abs() + half_h * cos.abs();

    let x0 = (placement.center_x - extent_x).floor().max(0.0) as u32;
    let y0 = (placement.center_y - extent_y).floor().max(0.0) as u32;
    let x1 = ((placement.center_x + extent_x).ceil() as i64).clamp(0, surface.width as i64) as u32;
    let y1 = ((placement.center_y + extent_y).ceil() as i64).clamp(0, surface.height as i64) as u32;

    // Source pixels per destination pixel on each axis.
    let step_x = src.width as f64 / placement.width;
    let step_y = src.height as f64 / placement.height;

    for dst_y in y0..y1 {
        for dst_x in x0..x1 {
            // Destination pixel center, relative to the box center
            let dx = dst_x as f64 + 0.5 - placement.center_x;
            let dy = dst_y as f64 + 0.5 - placement.center_y;

            // Undo the rotation to land in the unrotated box
            let u = dx * cos + dy * sin;
            let v = -dx * sin + dy * cos;

            if u < -half_w || u >= half_w || v < -half_h || v >= half_h {
                continue;
            }

            // Undo the stretch to land in source pixel coordinates
            let src_x = (u + half_w) * step_x - 0.5;
            let src_y = (v + half_h) * step_y - 0.5;

            let pixel = sample_bilinear(src, src_x, src_y);
            let dst_idx = ((dst_y * surface.width + dst_x) * 3) as usize;
            surface.pixels[dst_idx] = pixel[0];
            surface.pixels[dst_idx + 1] = pixel[1];
            surface.pixels[dst_idx + 2] = pixel[2];
        }
    }
}

/// Get a pixel as [f64; 3] from an image at the given coordinates.
#[inline]
fn get_pixel_f64(image: &Bitmap, px: usize, py: usize) -> [f64; 3] {
    let idx = (py * image.width as usize + px) * 3;
    [
        image.pixels[idx] as f64,
        image.pixels[idx + 1] as f64,
        image.pixels[idx + 2] as f64,
    ]
}

/// Sample a pixel using bilinear interpolation, clamping at the edges.
///
/// Coordinates outside the image sample the nearest edge pixel rather than
/// fading to black — the caller has already confined sampling to the
/// destination box, so clamping only affects the outermost half-pixel ring.
fn sample_bilinear(image: &Bitmap, x: f64, y: f64) -> [u8; 3] {
    let max_x = (image.width - 1) as f64;
    let max_y = (image.height - 1) as f64;
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(max_x as usize);
    let y1 = (y0 + 1).min(max_y as usize);

    // Fractional distances
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = get_pixel_f64(image, x0, y0);
    let p10 = get_pixel_f64(image, x1, y0);
    let p01 = get_pixel_f64(image, x0, y1);
    let p11 = get_pixel_f64(image, x1, y1);

    // Bilinear interpolation formula
    let mut result = [0u8; 3];
    for i in 0..3 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    result
}
