//! Grid arithmetic
//!
//! The grid is derived analytically from a cell's index on its page, so
//! no cursor state is carried between cells.

use crate::options::PageGeometry;

use super::{GridPosition, Rect};

// =============================================================================
// Grid Dimensions
// =============================================================================

/// Number of cells that fit across one row.
///
/// A cell is placed while its right edge stays within the right margin.
/// At least one cell is always placed per row.
pub fn columns_per_row(geometry: &PageGeometry) -> usize {
    let fit = ((geometry.usable_width() + geometry.spacing_x) / geometry.column_pitch() + 1e-4)
        .floor();
    if fit.is_finite() && fit >= 1.0 {
        fit as usize
    } else {
        1
    }
}

/// Rows needed to hold `images_per_page` cells
pub fn rows_per_page(geometry: &PageGeometry, images_per_page: usize) -> usize {
    images_per_page.div_ceil(columns_per_row(geometry))
}

// =============================================================================
// Cell Calculations
// =============================================================================

/// Grid position of the `slot`-th cell on a page
pub fn grid_position(slot: usize, per_row: usize) -> GridPosition {
    let per_row = per_row.max(1);
    GridPosition::new(slot / per_row, slot % per_row)
}

/// Bounds of the cell (image area only, caption excluded) at `pos`
pub fn cell_bounds(geometry: &PageGeometry, pos: GridPosition) -> Rect {
    Rect::new(
        geometry.margin_x + pos.col as f32 * geometry.column_pitch(),
        geometry.margin_y + pos.row as f32 * geometry.row_pitch(),
        geometry.cell_max_width,
        geometry.cell_max_height,
    )
}

/// Caption slot directly under the cell at `pos`
pub fn caption_bounds(geometry: &PageGeometry, pos: GridPosition) -> Rect {
    let cell = cell_bounds(geometry, pos);
    Rect::new(cell.x, cell.bottom(), cell.width, geometry.caption_height)
}

/// Uniform scale that fits a `width` x `height` image inside the cell
pub fn fit_scale(width: f32, height: f32, geometry: &PageGeometry) -> f32 {
    if width <= 0.0 || height <= 0.0 {
        return 0.0;
    }
    (geometry.cell_max_width / width).min(geometry.cell_max_height / height)
}

/// Lowest point any cell or caption reaches with `images_per_page` cells
pub fn content_bottom(geometry: &PageGeometry, images_per_page: usize) -> f32 {
    let rows = rows_per_page(geometry, images_per_page).max(1);
    let last_row = GridPosition::new(rows - 1, 0);
    caption_bounds(geometry, last_row).bottom()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_columns() {
        // x = 25, 185, 345 fit; 505 + 150 > 575 wraps
        assert_eq!(columns_per_row(&PageGeometry::default()), 3);
    }

    #[test]
    fn test_exact_fit_does_not_wrap() {
        // Third cell's right edge lands exactly on the right margin at 495
        let tight = PageGeometry {
            page_width: 520.0,
            ..Default::default()
        };
        assert_eq!(columns_per_row(&tight), 3);

        let short = PageGeometry {
            page_width: 519.0,
            ..Default::default()
        };
        assert_eq!(columns_per_row(&short), 2);
    }

    #[test]
    fn test_narrow_page_still_places_one() {
        let geometry = PageGeometry {
            page_width: 100.0,
            ..Default::default()
        };
        assert_eq!(columns_per_row(&geometry), 1);
    }

    #[test]
    fn test_rows_per_page() {
        let geometry = PageGeometry::default();
        assert_eq!(rows_per_page(&geometry, 15), 5);
        assert_eq!(rows_per_page(&geometry, 16), 6);
        assert_eq!(rows_per_page(&geometry, 1), 1);
    }

    #[test]
    fn test_grid_position() {
        assert_eq!(grid_position(0, 3), GridPosition::new(0, 0));
        assert_eq!(grid_position(2, 3), GridPosition::new(0, 2));
        assert_eq!(grid_position(3, 3), GridPosition::new(1, 0));
        assert_eq!(grid_position(14, 3), GridPosition::new(4, 2));
    }

    #[test]
    fn test_cell_bounds() {
        let geometry = PageGeometry::default();

        let first = cell_bounds(&geometry, GridPosition::new(0, 0));
        assert_eq!(first, Rect::new(25.0, 25.0, 150.0, 100.0));

        // Second row: 25 + 100 + 10 + 20
        let bounds = cell_bounds(&geometry, GridPosition::new(1, 2));
        assert_eq!(bounds.x, 345.0);
        assert_eq!(bounds.y, 155.0);
    }

    #[test]
    fn test_caption_under_cell() {
        let geometry = PageGeometry::default();
        let caption = caption_bounds(&geometry, GridPosition::new(0, 1));
        assert_eq!(caption, Rect::new(185.0, 125.0, 150.0, 20.0));
    }

    #[test]
    fn test_fit_scale_exact() {
        let geometry = PageGeometry::default();
        let scale = fit_scale(3000.0, 2000.0, &geometry);
        assert!((scale - 0.05).abs() < 1e-6);
        assert!((3000.0 * scale - 150.0).abs() < 1e-3);
        assert!((2000.0 * scale - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_fit_scale_portrait_is_height_bound() {
        let geometry = PageGeometry::default();
        let scale = fit_scale(1000.0, 2000.0, &geometry);
        assert!((scale - 0.05).abs() < 1e-6);
        assert!((1000.0 * scale - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_fit_scale_degenerate() {
        assert_eq!(fit_scale(0.0, 100.0, &PageGeometry::default()), 0.0);
    }

    #[test]
    fn test_default_content_fits_page() {
        let geometry = PageGeometry::default();
        // 25 + 4 * 130 + 100 + 20
        assert_eq!(content_bottom(&geometry, 15), 665.0);
        assert!(content_bottom(&geometry, 15) <= geometry.page_height);
    }
}
