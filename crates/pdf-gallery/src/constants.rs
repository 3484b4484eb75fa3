//! Default values for gallery generation
//!
//! Every tunable in [`GalleryOptions`](crate::GalleryOptions) starts from one
//! of these. Geometry is in PDF points with a top-left origin.

// =============================================================================
// Normalization
// =============================================================================

/// Images above this size are resized and re-encoded (2 MiB)
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 2 * 1024 * 1024;

/// Maximum pixel width of a reduced image
pub const DEFAULT_TARGET_WIDTH: u32 = 1920;

/// JPEG quality factor used when re-encoding
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// Extensions accepted from the source folder (compared case-insensitively)
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

// =============================================================================
// Chunking
// =============================================================================

/// Images per intermediate document
pub const DEFAULT_CHUNK_SIZE: usize = 15;

/// Images per page. Kept separate from the chunk size even though they match.
pub const DEFAULT_IMAGES_PER_PAGE: usize = 15;

// =============================================================================
// Page Geometry
// =============================================================================

pub const DEFAULT_PAGE_WIDTH: f32 = 600.0;
pub const DEFAULT_PAGE_HEIGHT: f32 = 800.0;

/// Largest box an image is scaled into
pub const DEFAULT_CELL_MAX_WIDTH: f32 = 150.0;
pub const DEFAULT_CELL_MAX_HEIGHT: f32 = 100.0;

pub const DEFAULT_MARGIN_X: f32 = 25.0;
pub const DEFAULT_MARGIN_Y: f32 = 25.0;

pub const DEFAULT_SPACING_X: f32 = 10.0;
pub const DEFAULT_SPACING_Y: f32 = 10.0;

/// Extra vertical room reserved under each row for captions
pub const DEFAULT_CAPTION_HEIGHT: f32 = 20.0;

pub const DEFAULT_CAPTION_FONT_SIZE: f32 = 8.0;

/// Approximate character width ratio for Helvetica
pub const HELVETICA_CHAR_WIDTH_RATIO: f32 = 0.5;

// =============================================================================
// Working Areas & Output
// =============================================================================

pub const NORMALIZED_DIR_NAME: &str = "normalized";
pub const DOCUMENTS_DIR_NAME: &str = "documents";

pub const DEFAULT_OUTPUT_PREFIX: &str = "gallery";

/// Timestamp appended to the output file name
pub const OUTPUT_DATE_FORMAT: &str = "%Y-%m-%d_%H%M%S";
