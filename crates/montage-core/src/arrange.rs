//! Grid auto-arrangement.
//!
//! Lays N images out on a near-square grid filling the viewport: column
//! count is `ceil(sqrt(n))`, rows follow, and each image is centered in its
//! cell at its current size. Only positions change — sizes, rotations and
//! z-order are untouched — so the result is a pure function of the image
//! sizes, their insertion order, and the viewport, and re-running it with
//! unchanged inputs is a no-op.

use crate::layout::Layout;

/// Compute grid cell positions for a list of image sizes.
///
/// Returns one `(x, y)` top-left per input size, row-major in input order,
/// each centering its image inside a `canvas_w / columns` by
/// `canvas_h / rows` cell. An image larger than its cell gets a negative
/// offset, keeping it centered rather than clamped.
pub fn grid_positions(sizes: &[(f64, f64)], canvas_w: f64, canvas_h: f64) -> Vec<(f64, f64)> {
    let n = sizes.len();
    if n == 0 {
        return Vec::new();
    }

    let columns = (n as f64).sqrt().ceil() as usize;
    let rows = n.div_ceil(columns);

    let cell_w = canvas_w / columns as f64;
    let cell_h = canvas_h / rows as f64;

    sizes
        .iter()
        .enumerate()
        .map(|(i, &(w, h))| {
            let row = i / columns;
            let col = i % columns;
            let x = col as f64 * cell_w + (cell_w - w) / 2.0;
            let y = row as f64 * cell_h + (cell_h - h) / 2.0;
            (x, y)
        })
        .collect()
}

/// Arrange every image in the layout onto the grid.
///
/// Images are placed in insertion order (not z-order). Silent no-op for an
/// empty layout.
pub fn auto_arrange(layout: &mut Layout, canvas_w: f64, canvas_h: f64) {
    let sizes: Vec<(f64, f64)> = layout
        .images()
        .iter()
        .map(|img| (img.width, img.height))
        .collect();
    let positions = grid_positions(&sizes, canvas_w, canvas_h);

    for (img, (x, y)) in layout.images_mut().iter_mut().zip(positions) {
        img.x = x;
        img.y = y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceId;

    #[test]
    fn test_four_images_form_two_by_two() {
        // Four 100x100 images in a 400x400 viewport: 2x2 grid of 200x200
        // cells, each image centered in its cell.
        let sizes = vec![(100.0, 100.0); 4];
        let positions = grid_positions(&sizes, 400.0, 400.0);

        assert_eq!(
            positions,
            vec![(50.0, 50.0), (250.0, 50.0), (50.0, 250.0), (250.0, 250.0)]
        );
    }

    #[test]
    fn test_single_image_centers_in_viewport() {
        let positions = grid_positions(&[(100.0, 50.0)], 400.0, 300.0);
        assert_eq!(positions, vec![(150.0, 125.0)]);
    }

    #[test]
    fn test_three_images_use_two_columns() {
        // ceil(sqrt(3)) = 2 columns, 2 rows; third image starts row two
        let sizes = vec![(10.0, 10.0); 3];
        let positions = grid_positions(&sizes, 200.0, 200.0);

        assert_eq!(positions[0], (45.0, 45.0));
        assert_eq!(positions[1], (145.0, 45.0));
        assert_eq!(positions[2], (45.0, 145.0));
    }

    #[test]
    fn test_five_images_use_three_columns() {
        // ceil(sqrt(5)) = 3 columns, 2 rows
        let sizes = vec![(30.0, 30.0); 5];
        let positions = grid_positions(&sizes, 300.0, 200.0);

        assert_eq!(positions.len(), 5);
        assert_eq!(positions[3], (35.0, 135.0)); // row 1, col 0
        assert_eq!(positions[4], (135.0, 135.0)); // row 1, col 1
    }

    #[test]
    fn test_oversized_image_goes_negative() {
        // A 500-wide image in a 400-wide single cell centers past the edge
        let positions = grid_positions(&[(500.0, 100.0)], 400.0, 400.0);
        assert_eq!(positions[0].0, -50.0);
    }

    #[test]
    fn test_empty_input() {
        assert!(grid_positions(&[], 400.0, 400.0).is_empty());
    }

    #[test]
    fn test_auto_arrange_applies_positions_only() {
        let mut layout = Layout::new();
        for i in 0..4 {
            let id = layout.add_image(SourceId::from_raw(i), Some((100, 100)));
            layout.set_rotation(id, 45.0);
        }

        auto_arrange(&mut layout, 400.0, 400.0);

        // 100x100 naturals display at 200x200, exactly filling each 200x200 cell
        let imgs = layout.images();
        assert_eq!((imgs[0].x, imgs[0].y), (0.0, 0.0));
        assert_eq!((imgs[3].x, imgs[3].y), (200.0, 200.0));
        assert_eq!(imgs[0].rotation, 45.0);
        assert_eq!(imgs[0].width, 200.0);
    }

    #[test]
    fn test_auto_arrange_uses_insertion_order_not_z() {
        let mut layout = Layout::new();
        let a = layout.add_image(SourceId::from_raw(1), Some((100, 100)));
        let b = layout.add_image(SourceId::from_raw(2), Some((100, 100)));

        // Promote `a` to the top; arrangement must still follow insertion order
        layout.select_image(a).unwrap();
        auto_arrange(&mut layout, 400.0, 400.0);

        let ia = layout.get(a).unwrap();
        let ib = layout.get(b).unwrap();
        assert!(ia.x < ib.x, "first-inserted lands in the first cell");
    }

    #[test]
    fn test_auto_arrange_idempotent() {
        let mut layout = Layout::new();
        for i in 0..5 {
            layout.add_image(SourceId::from_raw(i), Some((300, 200)));
        }

        auto_arrange(&mut layout, 640.0, 480.0);
        let first: Vec<(f64, f64)> = layout.images().iter().map(|i| (i.x, i.y)).collect();

        auto_arrange(&mut layout, 640.0, 480.0);
        let second: Vec<(f64, f64)> = layout.images().iter().map(|i| (i.x, i.y)).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_auto_arrange_empty_layout_is_noop() {
        let mut layout = Layout::new();
        auto_arrange(&mut layout, 400.0, 400.0);
        assert!(layout.is_empty());
    }
}
