//! Intermediate document generation, one PDF per chunk

use crate::layout::{ChunkLayout, layout_chunk};
use crate::options::{GalleryOptions, PageGeometry};
use crate::render::{DocumentWriter, PdfWriter};
use crate::types::*;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Builds the intermediate document for one chunk.
///
/// Implementations must be safe to call concurrently for different chunks.
pub trait ChunkBuilder: Send + Sync {
    fn build(&self, chunk: &Chunk) -> Result<IntermediateDocument>;
}

/// Outcome of drawing a chunk's layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderSummary {
    pub placed: usize,
    pub skipped: usize,
}

/// Draw every cell of `layout` onto `writer`.
///
/// Images that cannot be placed are logged and left as blank cells; any
/// other error stops rendering.
pub fn render_chunk<W: DocumentWriter>(
    writer: &mut W,
    chunk: &Chunk,
    layout: &ChunkLayout,
    geometry: &PageGeometry,
) -> Result<RenderSummary> {
    let mut summary = RenderSummary::default();

    for page in &layout.pages {
        writer.open_page(geometry.page_width, geometry.page_height);

        for cell in &page.cells {
            let Some(image) = chunk.images.get(cell.index) else {
                continue;
            };

            match writer.place_image(&image.path, &cell.image_rect) {
                Ok(()) => {
                    writer.place_text(
                        &cell.caption.text,
                        &cell.caption.rect,
                        cell.caption.align,
                        geometry.caption_font_size,
                    );
                    summary.placed += 1;
                }
                Err(e) if e.is_recoverable() => {
                    log::warn!("Chunk {}: leaving cell {} blank: {}", chunk.index, cell.index, e);
                    summary.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    Ok(summary)
}

/// [`ChunkBuilder`] writing `chunk-NNNN.pdf` files with [`PdfWriter`]
#[derive(Debug, Clone)]
pub struct PdfChunkBuilder {
    geometry: PageGeometry,
    images_per_page: usize,
    output_dir: PathBuf,
}

impl PdfChunkBuilder {
    pub fn new(options: &GalleryOptions) -> Self {
        Self {
            geometry: options.geometry,
            images_per_page: options.images_per_page,
            output_dir: options.documents_dir(),
        }
    }

    /// Where the document for sequence index `index` is written
    pub fn document_path(&self, index: usize) -> PathBuf {
        document_path(&self.output_dir, index)
    }
}

impl ChunkBuilder for PdfChunkBuilder {
    fn build(&self, chunk: &Chunk) -> Result<IntermediateDocument> {
        let write_error = |reason: String| GalleryError::DocumentWrite {
            index: chunk.index,
            reason,
        };

        let layout = layout_chunk(chunk, &self.geometry, self.images_per_page);

        let mut writer = PdfWriter::new();
        let summary = render_chunk(&mut writer, chunk, &layout, &self.geometry)
            .map_err(|e| write_error(e.to_string()))?;
        let page_count = writer.page_count();
        let bytes = writer.finalize().map_err(|e| write_error(e.to_string()))?;

        let path = self.document_path(chunk.index);
        write_durably(&path, &bytes)
            .map_err(|e| write_error(format!("{}: {}", path.display(), e)))?;

        log::debug!(
            "Chunk {}: {} images placed, {} skipped, {} pages → {}",
            chunk.index,
            summary.placed,
            summary.skipped,
            page_count,
            path.display()
        );

        Ok(IntermediateDocument {
            index: chunk.index,
            path,
            page_count,
        })
    }
}

/// File name for the document with sequence index `index`.
///
/// Zero-padded so that lexical and sequence order agree.
pub fn document_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("chunk-{:04}.pdf", index))
}

/// Write `bytes` to `path` and flush them to storage before returning
fn write_durably(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
