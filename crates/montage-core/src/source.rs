//! Source bitmaps and the decode boundary.
//!
//! Decoding an uploaded file into pixels is the embedder's job (browser
//! `createImageBitmap`, a worker, or the `image` crate's decoders in native
//! hosts). The core only ever sees the finished product: a [`Bitmap`]
//! registered in a [`BitmapStore`], addressed by an opaque [`SourceId`].
//! Placed images hold the handle, never the pixels, so the layout model
//! stays cheap to clone and snapshot.
//!
//! A decode failure never reaches this module. The embedder simply adds the
//! image with unknown natural dimensions and the layout falls back to an
//! aspect ratio of 1.

use serde::{Deserialize, Serialize};

/// Opaque handle to a decoded bitmap owned by a [`BitmapStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceId(u32);

impl SourceId {
    /// Reconstruct a handle from its raw value (e.g. one round-tripped
    /// through JavaScript).
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw numeric value of this handle.
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A decoded image with RGB pixel data.
#[derive(Debug, Clone)]
pub struct Bitmap {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    /// Length should be width * height * 3.
    pub pixels: Vec<u8>,
}

impl Bitmap {
    /// Create a new Bitmap with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width as usize) * (height as usize) * 3,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a Bitmap of one solid color.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let count = (width as usize) * (height as usize);
        let mut pixels = Vec::with_capacity(count * 3);
        for _ in 0..count {
            pixels.extend_from_slice(&rgb);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a Bitmap from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.into_raw();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert to an image::RgbImage for further processing.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Get the size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}

/// Registry of decoded bitmaps, keyed by [`SourceId`].
///
/// The store is owned by the embedding session, outside the layout model.
/// Handles stay valid until [`remove`](BitmapStore::remove) is called; the
/// layout never frees or mutates pixel data.
#[derive(Debug, Default)]
pub struct BitmapStore {
    entries: Vec<(SourceId, Bitmap)>,
    next_id: u32,
}

impl BitmapStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a decoded bitmap and return its handle.
    pub fn insert(&mut self, bitmap: Bitmap) -> SourceId {
        self.next_id += 1;
        let id = SourceId(self.next_id);
        self.entries.push((id, bitmap));
        id
    }

    /// Look up a bitmap by handle.
    pub fn get(&self, id: SourceId) -> Option<&Bitmap> {
        self.entries
            .iter()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, bitmap)| bitmap)
    }

    /// Drop a bitmap, releasing its pixel memory. No-op for unknown handles.
    pub fn remove(&mut self, id: SourceId) {
        self.entries.retain(|(entry_id, _)| *entry_id != id);
    }

    /// Number of bitmaps currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no bitmaps.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitmap_creation() {
        let pixels = vec![0u8; 100 * 50 * 3];
        let img = Bitmap::new(100, 50, pixels);

        assert_eq!(img.width, 100);
        assert_eq!(img.height, 50);
        assert_eq!(img.pixel_count(), 5000);
        assert_eq!(img.byte_size(), 15000);
        assert!(!img.is_empty());
    }

    #[test]
    fn test_bitmap_empty() {
        let img = Bitmap::new(0, 0, vec![]);
        assert!(img.is_empty());
    }

    #[test]
    fn test_bitmap_filled() {
        let img = Bitmap::filled(4, 2, [255, 128, 0]);
        assert_eq!(img.byte_size(), 4 * 2 * 3);
        assert_eq!(&img.pixels[0..3], &[255, 128, 0]);
        assert_eq!(&img.pixels[21..24], &[255, 128, 0]);
    }

    #[test]
    fn test_rgb_image_round_trip() {
        let img = Bitmap::filled(8, 8, [10, 20, 30]);
        let rgb = img.to_rgb_image().unwrap();
        let back = Bitmap::from_rgb_image(rgb);
        assert_eq!(back.width, 8);
        assert_eq!(back.height, 8);
        assert_eq!(back.pixels, img.pixels);
    }

    #[test]
    fn test_store_insert_and_get() {
        let mut store = BitmapStore::new();
        let a = store.insert(Bitmap::filled(2, 2, [1, 2, 3]));
        let b = store.insert(Bitmap::filled(3, 3, [4, 5, 6]));

        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(a).unwrap().width, 2);
        assert_eq!(store.get(b).unwrap().width, 3);
    }

    #[test]
    fn test_store_remove() {
        let mut store = BitmapStore::new();
        let id = store.insert(Bitmap::filled(2, 2, [0, 0, 0]));
        store.remove(id);

        assert!(store.get(id).is_none());
        assert!(store.is_empty());

        // Removing again is a no-op
        store.remove(id);
    }

    #[test]
    fn test_store_handles_are_not_reused() {
        let mut store = BitmapStore::new();
        let a = store.insert(Bitmap::filled(1, 1, [0, 0, 0]));
        store.remove(a);
        let b = store.insert(Bitmap::filled(1, 1, [0, 0, 0]));
        assert_ne!(a, b);
    }

    #[test]
    fn test_source_id_raw_round_trip() {
        let id = SourceId::from_raw(42);
        assert_eq!(id.as_u32(), 42);
    }
}
