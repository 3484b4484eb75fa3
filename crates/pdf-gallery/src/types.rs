use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Invalid image {}: {reason}", .path.display())]
    InvalidImage { path: PathBuf, reason: String },
    #[error("Cannot place image {}: {reason}", .path.display())]
    ImagePlacement { path: PathBuf, reason: String },
    #[error("Failed to write document for chunk {index}: {reason}")]
    DocumentWrite { index: usize, reason: String },
    #[error("Failed to merge {}: {reason}", .path.display())]
    Merge { path: PathBuf, reason: String },
    #[error("No usable images in {}", .0.display())]
    NoImages(PathBuf),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl GalleryError {
    /// Per-image failures are skipped and logged; everything else aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GalleryError::InvalidImage { .. } | GalleryError::ImagePlacement { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, GalleryError>;

/// An image discovered in the source folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pub path: PathBuf,
    pub byte_size: u64,
}

impl SourceImage {
    pub fn file_name(&self) -> String {
        display_name(&self.path)
    }
}

/// A validated image copied (or reduced) into the normalization working area
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedImage {
    /// File name shared with the source image
    pub name: String,
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub byte_size: u64,
    pub outcome: NormalizeOutcome,
}

/// What the normalizer did with a source image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeOutcome {
    /// Copied byte-for-byte because it was under the size threshold
    PassThrough,
    /// Resized and/or re-encoded to bring it under the threshold
    Reduced,
}

/// An ordered group of images destined for one intermediate document
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// 1-based position in the final merge order
    pub index: usize,
    pub images: Vec<NormalizedImage>,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// A finalized per-chunk PDF in the documents working area
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntermediateDocument {
    pub index: usize,
    pub path: PathBuf,
    pub page_count: usize,
}

/// An image left out of the output, and why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedImage {
    pub name: String,
    pub reason: String,
}

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub output_path: PathBuf,
    pub discovered: usize,
    pub normalized: usize,
    pub reduced: usize,
    pub chunks: usize,
    pub pages: usize,
    /// Images rejected by the normalizer
    pub skipped: Vec<SkippedImage>,
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
