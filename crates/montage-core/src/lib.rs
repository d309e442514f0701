//! Montage Core - Canvas layout and compositing library
//!
//! This crate provides the engine behind the Montage canvas editor: the
//! geometric model of placed images, grid auto-arrangement, the pointer
//! drag state machine with snapping and clamping, and the export
//! compositor that flattens a layout into a single PNG.
//!
//! The crate is deliberately host-agnostic. Decoding uploaded files into
//! pixels, rendering the interactive canvas, and offering the exported
//! file for download are all the embedder's collaborators; the core only
//! sees decoded [`Bitmap`]s, pointer events, and configuration.

pub mod arrange;
pub mod compose;
pub mod geometry;
pub mod layout;
pub mod pointer;
pub mod source;

pub use arrange::auto_arrange;
pub use compose::{export_png, EncodeError, ExportArtifact, ExportError};
pub use layout::{ImageId, Layout, LayoutError, PlacedImage};
pub use pointer::DragController;
pub use source::{Bitmap, BitmapStore, SourceId};

use serde::{Deserialize, Serialize};

/// Resolution mode for the export compositor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputQuality {
    /// Scale the output up toward the sources' native resolutions.
    #[default]
    Original,
    /// Export at on-screen (display) resolution, 1:1.
    Display,
}

/// Configuration surface read by the core on each relevant operation.
///
/// Owned by the embedder and never persisted by the core. The viewport
/// dimensions track whatever the host canvas currently measures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSettings {
    /// Grid cell size in canvas units, within
    /// [`geometry::GRID_MIN`]..=[`geometry::GRID_MAX`].
    pub grid_size: u32,
    /// Whether dragged positions snap to the grid.
    pub snap_to_grid: bool,
    /// Export resolution mode.
    pub output_quality: OutputQuality,
    /// Current viewport width in canvas units.
    pub canvas_width: f64,
    /// Current viewport height in canvas units.
    pub canvas_height: f64,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            grid_size: 20,
            snap_to_grid: true,
            output_quality: OutputQuality::Original,
            canvas_width: 800.0,
            canvas_height: 600.0,
        }
    }
}

impl CanvasSettings {
    /// Create settings with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the grid size, clamping into the configurable range.
    pub fn set_grid_size(&mut self, size: u32) {
        self.grid_size = size.clamp(geometry::GRID_MIN, geometry::GRID_MAX);
    }

    /// Record the current viewport dimensions.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.canvas_width = width.max(0.0);
        self.canvas_height = height.max(0.0);
    }
}
