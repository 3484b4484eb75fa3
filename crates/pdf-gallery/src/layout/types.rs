//! Layout data types
//!
//! All coordinates here use a top-left origin with y growing downward,
//! matching how the grid is described. The PDF writer flips them.

/// A rectangle in points; `(x, y)` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge y coordinate
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center x coordinate
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// Horizontal text alignment within a caption slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Caption line under a cell
#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub text: String,
    pub rect: Rect,
    pub align: TextAlign,
}

/// Position within the page grid (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPosition {
    /// Row index (0 = top row)
    pub row: usize,
    /// Column index (0 = leftmost column)
    pub col: usize,
}

impl GridPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Where and how big one image is drawn
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementCell {
    /// Index of the image within its chunk
    pub index: usize,
    /// 0-based page within the chunk's document
    pub page: usize,
    pub grid_pos: GridPosition,
    /// Scaled image bounds, anchored at the cell's top-left corner
    pub image_rect: Rect,
    pub scale: f32,
    pub caption: Caption,
    /// This cell opens a new page
    pub starts_page: bool,
    /// The cursor wraps to the next row after this cell
    pub wraps_after: bool,
}

/// Cells that share one page
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PagePlan {
    pub cells: Vec<PlacementCell>,
}

/// Complete layout for one chunk
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChunkLayout {
    pub pages: Vec<PagePlan>,
}

impl ChunkLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All cells in emission order
    pub fn cells(&self) -> impl Iterator<Item = &PlacementCell> {
        self.pages.iter().flat_map(|page| page.cells.iter())
    }
}
