use crate::constants::*;
use crate::layout::content_bottom;
use crate::types::*;
use chrono::{DateTime, Local};
use std::path::PathBuf;

/// Fixed page and grid measurements, in points with a top-left origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub cell_max_width: f32,
    pub cell_max_height: f32,
    pub margin_x: f32,
    pub margin_y: f32,
    pub spacing_x: f32,
    pub spacing_y: f32,
    /// Vertical allowance under each cell for its caption line
    pub caption_height: f32,
    pub caption_font_size: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            page_width: DEFAULT_PAGE_WIDTH,
            page_height: DEFAULT_PAGE_HEIGHT,
            cell_max_width: DEFAULT_CELL_MAX_WIDTH,
            cell_max_height: DEFAULT_CELL_MAX_HEIGHT,
            margin_x: DEFAULT_MARGIN_X,
            margin_y: DEFAULT_MARGIN_Y,
            spacing_x: DEFAULT_SPACING_X,
            spacing_y: DEFAULT_SPACING_Y,
            caption_height: DEFAULT_CAPTION_HEIGHT,
            caption_font_size: DEFAULT_CAPTION_FONT_SIZE,
        }
    }
}

impl PageGeometry {
    /// Width available between the left and right margins
    pub fn usable_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin_x
    }

    /// Vertical distance from one row's top edge to the next
    pub fn row_pitch(&self) -> f32 {
        self.cell_max_height + self.spacing_y + self.caption_height
    }

    /// Horizontal distance from one cell's left edge to the next
    pub fn column_pitch(&self) -> f32 {
        self.cell_max_width + self.spacing_x
    }
}

/// Full configuration for one gallery run
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryOptions {
    // Locations
    pub source_dir: PathBuf,
    pub work_dir: PathBuf,
    pub output_dir: PathBuf,
    pub output_prefix: String,

    // Normalization
    pub max_image_bytes: u64,
    pub target_width: u32,
    pub jpeg_quality: u8,

    // Chunking
    pub chunk_size: usize,
    pub images_per_page: usize,

    // Layout
    pub geometry: PageGeometry,

    /// Upper bound on concurrently building chunks (None = all at once)
    pub max_concurrent_builds: Option<usize>,
}

impl Default for GalleryOptions {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("images"),
            work_dir: PathBuf::from("work"),
            output_dir: PathBuf::from("output"),
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            target_width: DEFAULT_TARGET_WIDTH,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            chunk_size: DEFAULT_CHUNK_SIZE,
            images_per_page: DEFAULT_IMAGES_PER_PAGE,
            geometry: PageGeometry::default(),
            max_concurrent_builds: None,
        }
    }
}

impl GalleryOptions {
    /// Options rooted at the given source, working and output directories
    pub fn new(
        source_dir: impl Into<PathBuf>,
        work_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            work_dir: work_dir.into(),
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }

    /// Working area holding normalized images
    pub fn normalized_dir(&self) -> PathBuf {
        self.work_dir.join(NORMALIZED_DIR_NAME)
    }

    /// Working area holding intermediate documents
    pub fn documents_dir(&self) -> PathBuf {
        self.work_dir.join(DOCUMENTS_DIR_NAME)
    }

    /// Final output path for a run started at `started`
    pub fn output_path_at(&self, started: DateTime<Local>) -> PathBuf {
        self.output_dir.join(format!(
            "{}-{}.pdf",
            self.output_prefix,
            started.format(OUTPUT_DATE_FORMAT)
        ))
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(GalleryError::Config(
                "Chunk size must be at least 1".to_string(),
            ));
        }

        if self.images_per_page == 0 {
            return Err(GalleryError::Config(
                "Images per page must be at least 1".to_string(),
            ));
        }

        if self.max_concurrent_builds == Some(0) {
            return Err(GalleryError::Config(
                "Concurrent build limit must be at least 1".to_string(),
            ));
        }

        if self.target_width == 0 {
            return Err(GalleryError::Config(
                "Target width must be at least 1 pixel".to_string(),
            ));
        }

        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(GalleryError::Config(format!(
                "JPEG quality must be between 1 and 100, got {}",
                self.jpeg_quality
            )));
        }

        if self.output_prefix.is_empty() {
            return Err(GalleryError::Config(
                "Output prefix must not be empty".to_string(),
            ));
        }

        let g = &self.geometry;
        if g.cell_max_width <= 0.0 || g.cell_max_height <= 0.0 {
            return Err(GalleryError::Config(
                "Cell dimensions must be positive".to_string(),
            ));
        }

        if g.cell_max_width > g.usable_width() {
            return Err(GalleryError::Config(format!(
                "Cell width {} does not fit between margins of a {} pt page",
                g.cell_max_width, g.page_width
            )));
        }

        let bottom = content_bottom(g, self.images_per_page);
        if bottom > g.page_height - g.margin_y {
            return Err(GalleryError::Config(format!(
                "{} images per page need {} pt of height, page allows {}",
                self.images_per_page,
                bottom,
                g.page_height - g.margin_y
            )));
        }

        Ok(())
    }
}
