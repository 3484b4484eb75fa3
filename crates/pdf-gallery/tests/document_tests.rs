use image::{Rgb, RgbImage};
use lopdf::Document;
use pdf_gallery::document::{PdfChunkBuilder, RenderSummary, document_path, render_chunk};
use pdf_gallery::layout::{Rect, TextAlign, layout_chunk};
use pdf_gallery::render::DocumentWriter;
use pdf_gallery::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn create_chunk(dir: &Path, index: usize, count: usize) -> Chunk {
    let images = (0..count)
        .map(|i| {
            let name = format!("img-{:02}-{:02}.png", index, i);
            let path = dir.join(&name);
            RgbImage::from_pixel(60, 40, Rgb([(i * 10) as u8, 90, 160]))
                .save(&path)
                .unwrap();
            NormalizedImage {
                name,
                path,
                width: 60,
                height: 40,
                byte_size: 0,
                outcome: NormalizeOutcome::PassThrough,
            }
        })
        .collect();
    Chunk { index, images }
}

fn options_in(root: &Path) -> GalleryOptions {
    let options = GalleryOptions::new(
        root.join("source"),
        root.join("work"),
        root.join("output"),
    );
    std::fs::create_dir_all(options.documents_dir()).unwrap();
    options
}

/// Records drawing calls and fails on configured paths
#[derive(Default)]
struct RecordingWriter {
    fail_on: Vec<PathBuf>,
    pages: usize,
    images: Vec<(PathBuf, Rect)>,
    captions: Vec<String>,
}

impl DocumentWriter for RecordingWriter {
    fn open_page(&mut self, _width: f32, _height: f32) {
        self.pages += 1;
    }

    fn place_image(&mut self, path: &Path, rect: &Rect) -> Result<()> {
        if self.fail_on.iter().any(|p| p == path) {
            return Err(GalleryError::ImagePlacement {
                path: path.to_owned(),
                reason: "refused".to_string(),
            });
        }
        self.images.push((path.to_owned(), *rect));
        Ok(())
    }

    fn place_text(&mut self, text: &str, _rect: &Rect, _align: TextAlign, _font_size: f32) {
        self.captions.push(text.to_string());
    }

    fn page_count(&self) -> usize {
        self.pages
    }

    fn finalize(self) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }
}

#[test]
fn test_full_chunk_builds_single_page() {
    let root = TempDir::new().unwrap();
    let options = options_in(root.path());
    let chunk = create_chunk(root.path(), 1, 15);

    let builder = PdfChunkBuilder::new(&options);
    let document = builder.build(&chunk).unwrap();

    assert_eq!(document.index, 1);
    assert_eq!(document.page_count, 1);
    assert_eq!(document.path, options.documents_dir().join("chunk-0001.pdf"));

    let loaded = Document::load(&document.path).unwrap();
    assert_eq!(loaded.get_pages().len(), 1);
}

#[test]
fn test_page_capacity_splits_chunk_across_pages() {
    let root = TempDir::new().unwrap();
    let options = GalleryOptions {
        images_per_page: 6,
        ..options_in(root.path())
    };
    let chunk = create_chunk(root.path(), 2, 15);

    let document = PdfChunkBuilder::new(&options).build(&chunk).unwrap();

    assert_eq!(document.page_count, 3);
    let loaded = Document::load(&document.path).unwrap();
    assert_eq!(loaded.get_pages().len(), 3);
}

#[test]
fn test_captions_written_to_page_content() {
    let root = TempDir::new().unwrap();
    let options = options_in(root.path());
    let chunk = create_chunk(root.path(), 3, 2);

    let document = PdfChunkBuilder::new(&options).build(&chunk).unwrap();

    let loaded = Document::load(&document.path).unwrap();
    let page_id = *loaded.get_pages().get(&1).unwrap();
    let content = String::from_utf8_lossy(&loaded.get_page_content(page_id).unwrap()).into_owned();
    assert!(content.contains("(img-03-00.png) Tj"));
    assert!(content.contains("(img-03-01.png) Tj"));
    assert_eq!(content.matches(" Do Q").count(), 2);
}

#[test]
fn test_unreadable_image_leaves_blank_cell() {
    let root = TempDir::new().unwrap();
    let options = options_in(root.path());
    let mut chunk = create_chunk(root.path(), 1, 4);
    std::fs::remove_file(&chunk.images[1].path).unwrap();
    chunk.images[1].path = root.path().join("gone.png");

    let document = PdfChunkBuilder::new(&options).build(&chunk).unwrap();

    assert_eq!(document.page_count, 1);
    let loaded = Document::load(&document.path).unwrap();
    let page_id = *loaded.get_pages().get(&1).unwrap();
    let content = String::from_utf8_lossy(&loaded.get_page_content(page_id).unwrap()).into_owned();
    assert_eq!(content.matches(" Do Q").count(), 3);
    assert!(!content.contains("img-01-01.png"));
}

#[test]
fn test_failed_placement_keeps_grid_position() {
    let root = TempDir::new().unwrap();
    let options = GalleryOptions::default();
    let chunk = create_chunk(root.path(), 1, 5);
    let layout = layout_chunk(&chunk, &options.geometry, options.images_per_page);

    let mut writer = RecordingWriter {
        fail_on: vec![chunk.images[1].path.clone()],
        ..Default::default()
    };
    let summary = render_chunk(&mut writer, &chunk, &layout, &options.geometry).unwrap();

    assert_eq!(summary, RenderSummary { placed: 4, skipped: 1 });
    assert_eq!(writer.pages, 1);
    assert_eq!(writer.images.len(), 4);
    assert_eq!(writer.captions.len(), 4);

    // Image 2 stays in the third column instead of moving into the gap
    let (path, rect) = &writer.images[1];
    assert_eq!(path, &chunk.images[2].path);
    assert_eq!(rect.x, 345.0);
    assert_eq!(rect.y, 25.0);
}

#[test]
fn test_unwritable_destination_is_document_write_error() {
    let root = TempDir::new().unwrap();
    // Documents directory never created
    let options = GalleryOptions::new(
        root.path().join("source"),
        root.path().join("missing-work"),
        root.path().join("output"),
    );
    let chunk = create_chunk(root.path(), 7, 1);

    let result = PdfChunkBuilder::new(&options).build(&chunk);
    match result {
        Err(GalleryError::DocumentWrite { index, .. }) => assert_eq!(index, 7),
        other => panic!("Expected DocumentWrite, got {:?}", other),
    }
}

#[test]
fn test_document_path_sorts_by_index() {
    let dir = Path::new("docs");
    let mut paths: Vec<PathBuf> = [12, 3, 100, 1]
        .iter()
        .map(|&i| document_path(dir, i))
        .collect();
    paths.sort();
    assert_eq!(
        paths,
        vec![
            dir.join("chunk-0001.pdf"),
            dir.join("chunk-0003.pdf"),
            dir.join("chunk-0012.pdf"),
            dir.join("chunk-0100.pdf"),
        ]
    );
}
