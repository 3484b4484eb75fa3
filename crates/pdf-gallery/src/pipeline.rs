//! End-to-end gallery run
//!
//! Stages run strictly in sequence, with document generation as the one
//! parallel stage:
//! 1. Discover source images and reset the working areas
//! 2. Normalize images into the working area
//! 3. Partition them into chunks
//! 4. Build one intermediate document per chunk, concurrently
//! 5. Merge the documents in sequence order
//! 6. Remove the working areas
//!
//! Any fatal error returns before cleanup, leaving the working areas in
//! place for inspection.

use crate::chunk::partition;
use crate::document::{ChunkBuilder, PdfChunkBuilder};
use crate::generate::generate_documents;
use crate::merge::merge_documents;
use crate::normalize::normalize_all;
use crate::options::GalleryOptions;
use crate::storage::{cleanup, list_source_images, reset_working_area};
use crate::types::*;
use chrono::Local;
use std::path::Path;
use std::sync::Arc;

/// Run the pipeline, naming the output after the current local time
pub async fn run(options: &GalleryOptions) -> Result<RunReport> {
    let output_path = options.output_path_at(Local::now());
    run_to(options, output_path).await
}

/// Run the pipeline, writing the final document to `output_path`
pub async fn run_to(options: &GalleryOptions, output_path: impl AsRef<Path>) -> Result<RunReport> {
    let builder = Arc::new(PdfChunkBuilder::new(options));
    run_with_builder(options, output_path, builder).await
}

/// Run the pipeline with a custom per-chunk document builder
pub async fn run_with_builder<B>(
    options: &GalleryOptions,
    output_path: impl AsRef<Path>,
    builder: Arc<B>,
) -> Result<RunReport>
where
    B: ChunkBuilder + ?Sized + 'static,
{
    options.validate()?;
    let output_path = output_path.as_ref();

    let sources = list_source_images(&options.source_dir).await?;
    log::info!(
        "Found {} images in {}",
        sources.len(),
        options.source_dir.display()
    );

    let normalized_dir = options.normalized_dir();
    let documents_dir = options.documents_dir();
    reset_working_area(&normalized_dir).await?;
    reset_working_area(&documents_dir).await?;

    let normalized = normalize_all(&sources, &normalized_dir, options).await?;
    log::info!(
        "Normalized {} images ({} reduced, {} skipped)",
        normalized.images.len(),
        normalized.reduced_count(),
        normalized.skipped.len()
    );

    if normalized.images.is_empty() {
        return Err(GalleryError::NoImages(options.source_dir.clone()));
    }

    let chunks = partition(&normalized.images, options.chunk_size);
    let chunk_count = chunks.len();

    let documents = generate_documents(chunks, builder, options.max_concurrent_builds).await?;
    let summary = merge_documents(&documents, output_path).await?;
    log::info!(
        "Merged {} documents ({} pages) → {}",
        summary.documents,
        summary.pages,
        summary.output_path.display()
    );

    cleanup(&[&normalized_dir, &documents_dir]).await?;

    Ok(RunReport {
        output_path: summary.output_path,
        discovered: sources.len(),
        normalized: normalized.images.len(),
        reduced: normalized.reduced_count(),
        chunks: chunk_count,
        pages: summary.pages,
        skipped: normalized.skipped,
    })
}
