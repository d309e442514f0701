//! The editor facade exposed to JavaScript.
//!
//! One [`Editor`] instance owns the whole editing session: the layout
//! model, the bitmap store, the drag controller, and the canvas settings.
//! The host UI forwards pointer events and control changes in, reads a
//! serialized snapshot back out after each mutation, and renders it; the
//! core never touches the DOM.
//!
//! # Usage
//!
//! ```typescript
//! const editor = new Editor();
//! editor.set_viewport(canvas.clientWidth, canvas.clientHeight);
//!
//! const id = editor.add_image(new JsBitmap(w, h, rgbPixels));
//! editor.auto_arrange();
//! render(editor.snapshot());
//!
//! canvas.onpointermove = (e) => {
//!   editor.pointer_move(e.offsetX, e.offsetY);
//!   render(editor.snapshot());
//! };
//!
//! const png = editor.export_png();
//! download(png, editor.export_filename());
//! ```

use montage_core::{
    arrange, compose, geometry, BitmapStore, CanvasSettings, DragController, ImageId, Layout,
};
use wasm_bindgen::prelude::*;

use crate::types::{quality_from_str, quality_name, ImageView, JsBitmap, LayoutView};

/// A complete canvas editing session.
#[wasm_bindgen]
#[derive(Default)]
pub struct Editor {
    layout: Layout,
    store: BitmapStore,
    drag: DragController,
    settings: CanvasSettings,
}

#[wasm_bindgen]
impl Editor {
    /// Create an empty editor with default settings.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Editor {
        Editor::default()
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    /// Record the canvas viewport size in CSS pixels.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.settings.set_viewport(width, height);
    }

    /// Set the snap grid size (clamped to the 5..=50 slider range).
    pub fn set_grid_size(&mut self, size: u32) {
        self.settings.set_grid_size(size);
    }

    /// Current snap grid size.
    #[wasm_bindgen(getter)]
    pub fn grid_size(&self) -> u32 {
        self.settings.grid_size
    }

    /// Enable or disable snap-to-grid for drags.
    pub fn set_snap_to_grid(&mut self, enabled: bool) {
        self.settings.snap_to_grid = enabled;
    }

    /// Whether drags snap to the grid.
    #[wasm_bindgen(getter)]
    pub fn snap_to_grid(&self) -> bool {
        self.settings.snap_to_grid
    }

    /// Set the export quality mode: `"original"` or `"display"`.
    pub fn set_output_quality(&mut self, quality: &str) {
        self.settings.output_quality = quality_from_str(quality);
    }

    /// Current export quality mode name.
    #[wasm_bindgen(getter)]
    pub fn output_quality(&self) -> String {
        quality_name(self.settings.output_quality).to_string()
    }

    // ------------------------------------------------------------------
    // Images
    // ------------------------------------------------------------------

    /// Place a decoded image on the canvas, consuming the bitmap.
    ///
    /// Returns the new image's id. The initial display size fits the
    /// bitmap's aspect ratio inside 200x200 canvas units.
    pub fn add_image(&mut self, bitmap: JsBitmap) -> u32 {
        let bitmap = bitmap.into_bitmap();
        let natural = (bitmap.width, bitmap.height);
        let source = self.store.insert(bitmap);
        self.layout.add_image(source, Some(natural)).as_u32()
    }

    /// Place an image whose decode failed.
    ///
    /// The layout proceeds with an unknown natural size (aspect ratio 1,
    /// 200x200 display box) and a 1x1 white placeholder bitmap backs the
    /// export so the session keeps working.
    pub fn add_placeholder(&mut self) -> u32 {
        let source = self
            .store
            .insert(montage_core::Bitmap::filled(1, 1, [255, 255, 255]));
        self.layout.add_image(source, None).as_u32()
    }

    /// Remove an image. Silently ignores unknown ids.
    pub fn remove_image(&mut self, id: u32) {
        let id = ImageId::from_raw(id);
        if let Some(img) = self.layout.get(id) {
            self.store.remove(img.source);
        }
        self.layout.remove_image(id);
        self.end_drag_if_orphaned();
    }

    /// Remove the selected image, if any (Delete/Backspace handler).
    pub fn delete_selected(&mut self) {
        if let Some(img) = self.layout.selected_image() {
            self.store.remove(img.source);
        }
        self.layout.remove_selected();
        self.end_drag_if_orphaned();
    }

    /// Select an image, bringing it to the front.
    ///
    /// # Errors
    ///
    /// Throws when the id is no longer in the layout.
    pub fn select_image(&mut self, id: u32) -> Result<(), JsValue> {
        self.layout
            .select_image(ImageId::from_raw(id))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Currently selected image id, if any.
    #[wasm_bindgen(getter)]
    pub fn selected_id(&self) -> Option<u32> {
        self.layout.selected().map(ImageId::as_u32)
    }

    /// Number of images on the canvas.
    #[wasm_bindgen(getter)]
    pub fn image_count(&self) -> usize {
        self.layout.len()
    }

    /// Set an image's rotation in degrees (any finite value; normalized
    /// into [0, 360)). Silently ignores unknown ids.
    pub fn set_rotation(&mut self, id: u32, degrees: f64) {
        self.layout
            .set_rotation(ImageId::from_raw(id), geometry::normalize_degrees(degrees));
    }

    /// Resize an image. With `lock_aspect`, the changed axis drives the
    /// other through the stored aspect ratio. Silently ignores unknown ids
    /// and degenerate sizes.
    pub fn resize_image(&mut self, id: u32, width: f64, height: f64, lock_aspect: bool) {
        self.layout
            .resize(ImageId::from_raw(id), width, height, lock_aspect);
    }

    /// Arrange all images into a grid filling the current viewport.
    pub fn auto_arrange(&mut self) {
        arrange::auto_arrange(
            &mut self.layout,
            self.settings.canvas_width,
            self.settings.canvas_height,
        );
    }

    // ------------------------------------------------------------------
    // Pointer events
    // ------------------------------------------------------------------

    /// Pointer pressed on an image: select it and begin a drag.
    ///
    /// # Errors
    ///
    /// Throws when the pressed id vanished before the event arrived.
    pub fn pointer_down(&mut self, id: u32, x: f64, y: f64) -> Result<(), JsValue> {
        self.drag
            .pointer_down(&mut self.layout, ImageId::from_raw(id), x, y)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Pointer moved: update the dragged image's position with clamping
    /// and (when enabled) grid snapping. Ignored outside a drag.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.drag
            .pointer_move(&mut self.layout, x, y, &self.settings);
    }

    /// Pointer released or left the canvas: end the drag.
    pub fn pointer_up(&mut self) {
        self.drag.pointer_up();
    }

    /// Whether a drag gesture is in progress.
    #[wasm_bindgen(getter)]
    pub fn dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    // ------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------

    /// Serialize the layout for the rendering collaborator.
    ///
    /// Returns `{ images: [{id, x, y, width, height, rotation, zIndex,
    /// selected}], selected }` with images in insertion order.
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        let selected = self.layout.selected();
        let view = LayoutView {
            images: self
                .layout
                .images()
                .iter()
                .map(|img| ImageView {
                    id: img.id.as_u32(),
                    x: img.x,
                    y: img.y,
                    width: img.width,
                    height: img.height,
                    rotation: img.rotation,
                    z_index: img.z_index,
                    selected: selected == Some(img.id),
                })
                .collect(),
            selected: selected.map(ImageId::as_u32),
        };
        serde_wasm_bindgen::to_value(&view).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Flatten the layout to PNG bytes at the configured quality.
    ///
    /// # Errors
    ///
    /// Throws for an empty layout or when the output surface cannot be
    /// produced.
    pub fn export_png(&self) -> Result<Vec<u8>, JsValue> {
        compose::export_png(&self.layout, &self.store, self.settings.output_quality)
            .map(|artifact| artifact.bytes)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Suggested filename for the exported PNG.
    pub fn export_filename(&self) -> String {
        compose::EXPORT_FILENAME.to_string()
    }
}

impl Editor {
    /// Drop the drag gesture when its image was just removed.
    fn end_drag_if_orphaned(&mut self) {
        if let Some(id) = self.drag.dragged_image() {
            if self.layout.get(id).is_none() {
                self.drag.pointer_up();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_bitmap(width: u32, height: u32) -> JsBitmap {
        JsBitmap::new(width, height, vec![128u8; (width * height * 3) as usize])
    }

    #[test]
    fn test_add_image_fits_display_box() {
        let mut editor = Editor::new();
        editor.add_image(gray_bitmap(400, 200));

        let img = &editor.layout.images()[0];
        assert_eq!(img.width, 200.0);
        assert_eq!(img.height, 100.0);
        assert_eq!(editor.image_count(), 1);
    }

    #[test]
    fn test_add_placeholder_is_square() {
        let mut editor = Editor::new();
        editor.add_placeholder();

        let img = &editor.layout.images()[0];
        assert_eq!(img.aspect_ratio, 1.0);
        assert_eq!((img.width, img.height), (200.0, 200.0));
    }

    #[test]
    fn test_remove_image_releases_bitmap() {
        let mut editor = Editor::new();
        let id = editor.add_image(gray_bitmap(10, 10));
        assert_eq!(editor.store.len(), 1);

        editor.remove_image(id);
        assert_eq!(editor.image_count(), 0);
        assert_eq!(editor.store.len(), 0);
    }

    #[test]
    fn test_drag_round_trip() {
        let mut editor = Editor::new();
        editor.set_viewport(800.0, 600.0);
        editor.set_snap_to_grid(false);
        let id = editor.add_image(gray_bitmap(100, 100));

        editor.pointer_down(id, 60.0, 60.0).unwrap();
        assert!(editor.dragging());
        editor.pointer_move(310.0, 210.0);
        editor.pointer_up();
        assert!(!editor.dragging());

        let img = &editor.layout.images()[0];
        assert_eq!((img.x, img.y), (300.0, 200.0));
    }

    #[test]
    fn test_drag_with_snap() {
        let mut editor = Editor::new();
        editor.set_viewport(800.0, 600.0);
        editor.set_snap_to_grid(true);
        editor.set_grid_size(25);
        let id = editor.add_image(gray_bitmap(100, 100));

        editor.pointer_down(id, 50.0, 50.0).unwrap();
        editor.pointer_move(88.0, 62.0);

        let img = &editor.layout.images()[0];
        assert_eq!((img.x, img.y), (100.0, 50.0));
    }

    #[test]
    fn test_delete_selected_ends_drag() {
        let mut editor = Editor::new();
        let id = editor.add_image(gray_bitmap(10, 10));

        editor.pointer_down(id, 50.0, 50.0).unwrap();
        editor.delete_selected();

        assert_eq!(editor.image_count(), 0);
        assert!(!editor.dragging());
        assert_eq!(editor.selected_id(), None);
    }

    #[test]
    fn test_settings_round_trip() {
        let mut editor = Editor::new();

        editor.set_grid_size(999);
        assert_eq!(editor.grid_size(), 50);

        editor.set_output_quality("display");
        assert_eq!(editor.output_quality(), "display");
        editor.set_output_quality("garbage");
        assert_eq!(editor.output_quality(), "original");
    }

    #[test]
    fn test_auto_arrange_through_facade() {
        let mut editor = Editor::new();
        editor.set_viewport(400.0, 400.0);
        for _ in 0..4 {
            editor.add_image(gray_bitmap(100, 100));
        }

        editor.auto_arrange();

        // 2x2 grid of 200x200 cells, each filled by a 200x200 image
        let imgs = editor.layout.images();
        assert_eq!((imgs[0].x, imgs[0].y), (0.0, 0.0));
        assert_eq!((imgs[3].x, imgs[3].y), (200.0, 200.0));
    }

    #[test]
    fn test_export_png_bytes() {
        let mut editor = Editor::new();
        editor.add_image(gray_bitmap(40, 40));
        editor.set_output_quality("display");

        let bytes = editor.export_png().unwrap();
        assert_eq!(&bytes[0..4], &[0x89, b'P', b'N', b'G']);
        assert_eq!(editor.export_filename(), "merged-image.png");
    }

    #[test]
    fn test_rotation_normalized() {
        let mut editor = Editor::new();
        let id = editor.add_image(gray_bitmap(10, 10));

        editor.set_rotation(id, -90.0);
        assert_eq!(editor.layout.images()[0].rotation, 270.0);

        editor.set_rotation(id, 450.0);
        assert_eq!(editor.layout.images()[0].rotation, 90.0);
    }
}
