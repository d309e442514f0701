//! Montage WASM - WebAssembly bindings for Montage
//!
//! This crate exposes the montage-core layout and compositing engine to
//! JavaScript/TypeScript applications. The host owns file upload, image
//! decoding, canvas rendering and the download trigger; the [`Editor`]
//! owns everything in between.
//!
//! # Module Structure
//!
//! - `editor` - The session facade: layout, drag handling, settings, export
//! - `types` - WASM-compatible wrapper types for image data
//!
//! # Usage
//!
//! ```typescript
//! import init, { Editor, JsBitmap } from '@montage/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const editor = new Editor();
//! const id = editor.add_image(new JsBitmap(width, height, rgbPixels));
//! editor.auto_arrange();
//! ```

use wasm_bindgen::prelude::*;

mod editor;
mod types;

// Re-export public types
pub use editor::Editor;
pub use types::JsBitmap;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Future: Set up panic hook for better error messages in browser console
    // when console_error_panic_hook feature is added
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
