//! WASM-compatible wrapper types for image data.
//!
//! This module provides JavaScript-friendly types that wrap the core
//! Montage types, handling the conversion between Rust and JavaScript data
//! representations.

use montage_core::{Bitmap, OutputQuality};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// A decoded bitmap wrapper for JavaScript.
///
/// The host decodes an uploaded file (e.g. with `createImageBitmap` plus a
/// canvas readback) and hands the RGB pixels across the boundary as one of
/// these. The editor then owns the pixel data for the image's lifetime.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. Passing the bitmap to
/// [`crate::Editor::add_image`] consumes it; call `free()` to release an
/// unused bitmap early, otherwise wasm-bindgen's finalizer will handle
/// cleanup automatically.
#[wasm_bindgen]
pub struct JsBitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsBitmap {
    /// Create a new JsBitmap from dimensions and pixel data.
    ///
    /// # Arguments
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsBitmap {
        JsBitmap {
            width,
            height,
            pixels,
        }
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of bytes in the pixel buffer (width * height * 3)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsBitmap {
    /// Convert into a core Bitmap, consuming the wrapper.
    pub(crate) fn into_bitmap(self) -> Bitmap {
        Bitmap::new(self.width, self.height, self.pixels)
    }
}

/// Convert a quality name from the host's `<select>` to the core enum.
///
/// Accepts `"original"` and `"display"`; anything else falls back to
/// original quality.
pub(crate) fn quality_from_str(value: &str) -> OutputQuality {
    match value {
        "display" => OutputQuality::Display,
        _ => OutputQuality::Original, // Default
    }
}

/// Name of a quality mode, as the host's `<select>` spells it.
pub(crate) fn quality_name(quality: OutputQuality) -> &'static str {
    match quality {
        OutputQuality::Original => "original",
        OutputQuality::Display => "display",
    }
}

/// Per-image record handed to the rendering collaborator.
///
/// Serialized with serde-wasm-bindgen into a plain JS object; field names
/// are camelCased to read naturally on the host side.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImageView {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub z_index: u32,
    pub selected: bool,
}

/// Full layout snapshot for the renderer: images in insertion order plus
/// the selected id.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LayoutView {
    pub images: Vec<ImageView>,
    pub selected: Option<u32>,
}
