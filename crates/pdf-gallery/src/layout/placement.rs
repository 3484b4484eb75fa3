//! Image placement within the page grid
//!
//! Each cell is a pure function of its index within the chunk, the image's
//! pixel size and the page geometry. A cell keeps its slot even if the image
//! later fails to render, so one bad image leaves a gap instead of shifting
//! the rest of the page.

use crate::options::PageGeometry;
use crate::types::Chunk;

use super::{
    Caption, ChunkLayout, PagePlan, PlacementCell, Rect, TextAlign, caption_bounds, cell_bounds,
    columns_per_row, fit_scale, grid_position,
};

/// Calculate the placement of the `index`-th image of a chunk.
///
/// # Arguments
/// * `index` - Position of the image within its chunk
/// * `pixel_size` - Image width and height in pixels
/// * `caption` - Display name printed under the image
/// * `geometry` - Page geometry
/// * `images_per_page` - Page capacity; a new page starts at each multiple
pub fn place_image(
    index: usize,
    pixel_size: (u32, u32),
    caption: &str,
    geometry: &PageGeometry,
    images_per_page: usize,
) -> PlacementCell {
    let per_page = images_per_page.max(1);
    let per_row = columns_per_row(geometry);
    let slot = index % per_page;
    let grid_pos = grid_position(slot, per_row);

    let (width, height) = (pixel_size.0 as f32, pixel_size.1 as f32);
    let scale = fit_scale(width, height, geometry);
    let cell = cell_bounds(geometry, grid_pos);

    PlacementCell {
        index,
        page: index / per_page,
        grid_pos,
        image_rect: Rect::new(cell.x, cell.y, width * scale, height * scale),
        scale,
        caption: Caption {
            text: caption.to_string(),
            rect: caption_bounds(geometry, grid_pos),
            align: TextAlign::Center,
        },
        starts_page: slot == 0,
        wraps_after: grid_pos.col + 1 == per_row,
    }
}

/// Lay out every image of a chunk, grouping cells into pages.
pub fn layout_chunk(
    chunk: &Chunk,
    geometry: &PageGeometry,
    images_per_page: usize,
) -> ChunkLayout {
    let mut layout = ChunkLayout::default();

    for (index, image) in chunk.images.iter().enumerate() {
        let cell = place_image(
            index,
            (image.width, image.height),
            &image.name,
            geometry,
            images_per_page,
        );

        if cell.starts_page {
            layout.pages.push(PagePlan::default());
        }
        if let Some(page) = layout.pages.last_mut() {
            page.cells.push(cell);
        }
    }

    layout
}

/// Number of pages a chunk of `image_count` images occupies
pub fn page_count(image_count: usize, images_per_page: usize) -> usize {
    image_count.div_ceil(images_per_page.max(1))
}

// =============================================================================
// Tests
// =============================================================================
