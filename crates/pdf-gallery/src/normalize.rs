//! Image normalization: pass small files through, shrink large ones

use crate::options::GalleryOptions;
use crate::render::flatten_onto_white;
use crate::types::*;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;

/// Result of normalizing a whole source folder
#[derive(Debug, Clone, Default)]
pub struct NormalizeReport {
    /// Normalized images in source enumeration order
    pub images: Vec<NormalizedImage>,
    pub skipped: Vec<SkippedImage>,
}

impl NormalizeReport {
    pub fn reduced_count(&self) -> usize {
        self.images
            .iter()
            .filter(|img| img.outcome == NormalizeOutcome::Reduced)
            .count()
    }
}

/// Normalize every source image into `work_dir`.
///
/// Undecodable images are logged and reported as skipped; only working-area
/// I/O failures abort.
pub async fn normalize_all(
    sources: &[SourceImage],
    work_dir: impl AsRef<Path>,
    options: &GalleryOptions,
) -> Result<NormalizeReport> {
    let sources = sources.to_vec();
    let work_dir = work_dir.as_ref().to_owned();
    let options = options.clone();

    tokio::task::spawn_blocking(move || {
        let mut report = NormalizeReport::default();

        for source in &sources {
            match normalize_image(source, &work_dir, &options) {
                Ok(image) => {
                    log::debug!(
                        "Normalized {} ({:?}, {}x{})",
                        image.name,
                        image.outcome,
                        image.width,
                        image.height
                    );
                    report.images.push(image);
                }
                Err(e) if e.is_recoverable() => {
                    log::warn!("Skipping image: {}", e);
                    report.skipped.push(SkippedImage {
                        name: source.file_name(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(report)
    })
    .await?
}

/// Normalize a single image into `work_dir`, keeping its file name.
pub fn normalize_image(
    source: &SourceImage,
    work_dir: &Path,
    options: &GalleryOptions,
) -> Result<NormalizedImage> {
    let (decoded, format) = decode(&source.path)?;
    let name = source.file_name();
    let mut destination = work_dir.join(&name);

    if source.byte_size <= options.max_image_bytes {
        std::fs::copy(&source.path, &destination)?;
        return Ok(NormalizedImage {
            name,
            path: destination,
            width: decoded.width(),
            height: decoded.height(),
            byte_size: source.byte_size,
            outcome: NormalizeOutcome::PassThrough,
        });
    }

    let reduced = shrink_to_width(decoded, options.target_width);
    let encode_error = |e: image::ImageError| GalleryError::InvalidImage {
        path: source.path.clone(),
        reason: format!("re-encode failed: {}", e),
    };

    let mut bytes = encode(&reduced, format, options.jpeg_quality).map_err(encode_error)?;
    if format == ImageFormat::Png && bytes.len() as u64 > options.max_image_bytes {
        // Lossless PNG cannot honour the quality factor; switch to JPEG
        bytes = encode_jpeg(&reduced, options.jpeg_quality).map_err(encode_error)?;
        destination = work_dir.join(format!("{}.jpg", name));
    }

    if bytes.len() as u64 > options.max_image_bytes {
        log::warn!(
            "{} is still {} bytes after reduction (limit {})",
            name,
            bytes.len(),
            options.max_image_bytes
        );
    }
    std::fs::write(&destination, &bytes)?;

    Ok(NormalizedImage {
        name,
        path: destination,
        width: reduced.width(),
        height: reduced.height(),
        byte_size: bytes.len() as u64,
        outcome: NormalizeOutcome::Reduced,
    })
}

/// Fully decode an image, returning it with its detected format
fn decode(path: &Path) -> Result<(DynamicImage, ImageFormat)> {
    let invalid = |reason: String| GalleryError::InvalidImage {
        path: path.to_owned(),
        reason,
    };

    let reader = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| invalid(e.to_string()))?;
    let format = reader
        .format()
        .ok_or_else(|| invalid("unrecognized image format".to_string()))?;
    let image = reader.decode().map_err(|e| invalid(e.to_string()))?;

    if image.width() == 0 || image.height() == 0 {
        return Err(invalid("image has no pixels".to_string()));
    }

    Ok((image, format))
}

/// Downscale to `max_width` preserving aspect ratio; never upscales
fn shrink_to_width(image: DynamicImage, max_width: u32) -> DynamicImage {
    if image.width() <= max_width {
        return image;
    }

    let height = (u64::from(image.height()) * u64::from(max_width) / u64::from(image.width()))
        .max(1) as u32;
    image.resize_exact(max_width, height, FilterType::Lanczos3)
}

/// Re-encode in the source format. PNG has no quality factor, so it gets
/// maximum compression instead.
fn encode(image: &DynamicImage, format: ImageFormat, quality: u8) -> image::ImageResult<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());

    match format {
        ImageFormat::Png => {
            let encoder = PngEncoder::new_with_quality(
                &mut buffer,
                CompressionType::Best,
                PngFilter::Adaptive,
            );
            image.write_with_encoder(encoder)?;
        }
        _ => return encode_jpeg(image, quality),
    }

    Ok(buffer.into_inner())
}

/// Encode as JPEG, compositing any alpha over white as the renderer does
fn encode_jpeg(image: &DynamicImage, quality: u8) -> image::ImageResult<Vec<u8>> {
    let rgb = flatten_onto_white(image.clone());
    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality).encode_image(&rgb)?;
    Ok(buffer.into_inner())
}
