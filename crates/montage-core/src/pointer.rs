//! Pointer interaction: the drag state machine.
//!
//! One gesture at a time, two states. Pointer-down on an image selects it
//! (bring-to-front) and records the grab offset so the image does not jump
//! under the pointer; every pointer-move recomputes the top-left from the
//! live pointer position, clamps it to the canvas, optionally snaps it to
//! the grid, and writes it into the layout; pointer-up (or the pointer
//! leaving the canvas) ends the gesture unconditionally. There is no
//! drag-abort — the last live-updated position stands.

use crate::geometry;
use crate::layout::{ImageId, Layout, LayoutError};
use crate::CanvasSettings;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
enum DragState {
    #[default]
    Idle,
    Dragging {
        image: ImageId,
        offset_x: f64,
        offset_y: f64,
    },
}

/// Translates pointer events into layout updates.
#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    /// Create a controller in the idle state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a drag gesture is active.
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// The image being dragged, if any.
    pub fn dragged_image(&self) -> Option<ImageId> {
        match self.state {
            DragState::Dragging { image, .. } => Some(image),
            DragState::Idle => None,
        }
    }

    /// Begin a drag on the pressed image.
    ///
    /// Selects the image first when it is not already selected (which also
    /// brings it to the front), then records the offset between the pointer
    /// and the image's top-left.
    ///
    /// # Errors
    ///
    /// [`LayoutError::NotFound`] when the pressed id vanished (e.g. deleted
    /// between render and press); the controller stays idle.
    pub fn pointer_down(
        &mut self,
        layout: &mut Layout,
        id: ImageId,
        pointer_x: f64,
        pointer_y: f64,
    ) -> Result<(), LayoutError> {
        if layout.selected() != Some(id) {
            layout.select_image(id)?;
        }
        let img = layout.get(id).ok_or(LayoutError::NotFound(id))?;
        self.state = DragState::Dragging {
            image: id,
            offset_x: pointer_x - img.x,
            offset_y: pointer_y - img.y,
        };
        Ok(())
    }

    /// Track a pointer move.
    ///
    /// Ignored when no gesture is active. The candidate position is clamped
    /// to the viewport, snapped to the grid when snapping is enabled, and
    /// written through [`Layout::update_position`]. A gesture whose image
    /// was deleted mid-drag ends silently.
    pub fn pointer_move(
        &mut self,
        layout: &mut Layout,
        pointer_x: f64,
        pointer_y: f64,
        settings: &CanvasSettings,
    ) {
        let DragState::Dragging {
            image,
            offset_x,
            offset_y,
        } = self.state
        else {
            return;
        };

        if layout.get(image).is_none() {
            self.state = DragState::Idle;
            return;
        }

        let (mut x, mut y) = geometry::clamp_to_bounds(
            pointer_x - offset_x,
            pointer_y - offset_y,
            settings.canvas_width,
            settings.canvas_height,
        );
        if settings.snap_to_grid {
            (x, y) = geometry::snap_to_grid(x, y, settings.grid_size);
        }
        layout.update_position(image, x, y);
    }

    /// End the gesture. Safe to call when already idle (pointer-up and
    /// pointer-leave both route here).
    pub fn pointer_up(&mut self) {
        self.state = DragState::Idle;
    }
}
