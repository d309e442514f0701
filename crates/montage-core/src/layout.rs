//! The layout model: placed images plus the current selection.
//!
//! A [`Layout`] is the entire mutable state of an editing session — an
//! insertion-ordered collection of [`PlacedImage`] records and a single
//! optional selected id. All mutation goes through the operations here;
//! none of them applies geometry policy (clamping, snapping), which stays
//! in [`crate::geometry`] so callers decide when to invoke it.
//!
//! # Absent-id behavior
//!
//! Every operation on an id that is no longer in the layout is a silent
//! no-op, except [`select_image`](Layout::select_image) which reports
//! [`LayoutError::NotFound`]. Selection failure is user-visible (nothing
//! highlights), while a position or resize update racing a delete should
//! simply be dropped.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{self, Bounds, DEFAULT_DISPLAY_EDGE, DEFAULT_OFFSET};
use crate::source::SourceId;

/// Errors reported by layout operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// The referenced image is not (or no longer) in the layout.
    #[error("image {0} not found in layout")]
    NotFound(ImageId),
}

/// Stable identifier of one placed image, unique for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImageId(u32);

impl ImageId {
    /// Reconstruct an id from its raw value (e.g. one round-tripped
    /// through JavaScript).
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw numeric value of this id.
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One image instance on the canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedImage {
    /// Stable identity, assigned at creation.
    pub id: ImageId,
    /// Handle to the decoded bitmap in the embedder's store.
    pub source: SourceId,
    /// Top-left x in canvas units.
    pub x: f64,
    /// Top-left y in canvas units.
    pub y: f64,
    /// Display width in canvas units, always positive.
    pub width: f64,
    /// Display height in canvas units, always positive.
    pub height: f64,
    /// Rotation about the image center, degrees in [0, 360).
    pub rotation: f64,
    /// Paint order; higher paints later (on top). Not contiguous.
    pub z_index: u32,
    /// natural_width / natural_height, fixed at creation. Never recomputed
    /// from the current width/height.
    pub aspect_ratio: f64,
    /// Source pixel dimensions; `None` when the decoder could not report
    /// them. Consulted only by the export scale factor.
    pub natural: Option<(u32, u32)>,
}

/// The full editing state: ordered images plus the optional selection.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    images: Vec<PlacedImage>,
    selected: Option<ImageId>,
    next_id: u32,
}

impl Layout {
    /// Create an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether the layout holds no images.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// All images in insertion order.
    pub fn images(&self) -> &[PlacedImage] {
        &self.images
    }

    /// Mutable access in insertion order, for same-crate bulk updates
    /// (auto-arrange).
    pub(crate) fn images_mut(&mut self) -> &mut [PlacedImage] {
        &mut self.images
    }

    /// Look up one image by id.
    pub fn get(&self, id: ImageId) -> Option<&PlacedImage> {
        self.images.iter().find(|img| img.id == id)
    }

    fn get_mut(&mut self, id: ImageId) -> Option<&mut PlacedImage> {
        self.images.iter_mut().find(|img| img.id == id)
    }

    /// Currently selected id, if any.
    pub fn selected(&self) -> Option<ImageId> {
        self.selected
    }

    /// Currently selected image record, if any.
    pub fn selected_image(&self) -> Option<&PlacedImage> {
        self.selected.and_then(|id| self.get(id))
    }

    /// Highest z-index among live images, 0 when empty.
    pub fn max_z_index(&self) -> u32 {
        self.images.iter().map(|img| img.z_index).max().unwrap_or(0)
    }

    /// Place a new image on the canvas.
    ///
    /// The initial display size fits the natural aspect ratio inside a
    /// 200x200 box (longer side = 200); unknown or degenerate natural
    /// dimensions fall back to aspect 1 and a 200x200 box. The image lands
    /// at the default offset with the highest z-index. Always succeeds —
    /// decode failures were already absorbed by the embedder as
    /// `natural = None`.
    pub fn add_image(&mut self, source: SourceId, natural: Option<(u32, u32)>) -> ImageId {
        let natural = natural.filter(|&(w, h)| w > 0 && h > 0);
        let aspect_ratio = natural
            .map(|(w, h)| w as f64 / h as f64)
            .unwrap_or(1.0);
        let (width, height) = geometry::fit_within(aspect_ratio, DEFAULT_DISPLAY_EDGE);

        self.next_id += 1;
        let id = ImageId(self.next_id);
        let (x, y) = DEFAULT_OFFSET;
        self.images.push(PlacedImage {
            id,
            source,
            x,
            y,
            width,
            height,
            rotation: 0.0,
            z_index: self.max_z_index() + 1,
            aspect_ratio,
            natural,
        });
        id
    }

    /// Remove an image. No-op for an absent id.
    ///
    /// When the removed image was selected, selection moves to the first
    /// remaining image in insertion order, or to none.
    pub fn remove_image(&mut self, id: ImageId) {
        let before = self.images.len();
        self.images.retain(|img| img.id != id);
        if self.images.len() == before {
            return;
        }
        if self.selected == Some(id) {
            self.selected = self.images.first().map(|img| img.id);
        }
    }

    /// Remove whichever image is selected, if any.
    pub fn remove_selected(&mut self) {
        if let Some(id) = self.selected {
            self.remove_image(id);
        }
    }

    /// Select an image and bring it to the front.
    ///
    /// # Errors
    ///
    /// [`LayoutError::NotFound`] when the id is absent — the one operation
    /// that signals, because a failed selection is user-visible.
    pub fn select_image(&mut self, id: ImageId) -> Result<(), LayoutError> {
        let top = self.max_z_index() + 1;
        let img = self.get_mut(id).ok_or(LayoutError::NotFound(id))?;
        img.z_index = top;
        self.selected = Some(id);
        Ok(())
    }

    /// Overwrite an image's position verbatim. No-op for an absent id.
    ///
    /// Clamping and snapping are the caller's responsibility; see
    /// [`crate::geometry`].
    pub fn update_position(&mut self, id: ImageId, x: f64, y: f64) {
        if let Some(img) = self.get_mut(id) {
            img.x = x;
            img.y = y;
        }
    }

    /// Overwrite an image's rotation verbatim. No-op for an absent id.
    ///
    /// Callers normalize into [0, 360) via
    /// [`geometry::normalize_degrees`].
    pub fn set_rotation(&mut self, id: ImageId, degrees: f64) {
        if let Some(img) = self.get_mut(id) {
            img.rotation = degrees;
        }
    }

    /// Resize an image, optionally keeping its stored aspect ratio.
    ///
    /// With `lock_aspect`, the request routes through
    /// [`geometry::resize_keeping_aspect`] using the aspect ratio fixed at
    /// creation. The request is rejected (no-op) when either resulting
    /// dimension would fall below 1 unit or is not finite, so the model can
    /// never hold zero or negative geometry.
    pub fn resize(&mut self, id: ImageId, width: f64, height: f64, lock_aspect: bool) {
        let Some(img) = self.get_mut(id) else {
            return;
        };
        let (w, h) = if lock_aspect {
            geometry::resize_keeping_aspect(img.width, img.height, img.aspect_ratio, width, height)
        } else {
            (width, height)
        };
        if !w.is_finite() || !h.is_finite() || w < 1.0 || h < 1.0 {
            return;
        }
        img.width = w;
        img.height = h;
    }

    /// Bounding box over all images, `None` when empty.
    pub fn bounding_box(&self) -> Option<Bounds> {
        geometry::bounding_box(
            self.images
                .iter()
                .map(|img| (img.x, img.y, img.width, img.height)),
        )
    }

    /// Images in paint order: ascending z-index, ties keeping insertion
    /// order (stable sort).
    pub fn paint_order(&self) -> Vec<&PlacedImage> {
        let mut ordered: Vec<&PlacedImage> = self.images.iter().collect();
        ordered.sort_by_key(|img| img.z_index);
        ordered
    }
}
