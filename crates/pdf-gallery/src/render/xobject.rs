//! Image XObject creation
//!
//! Normalized images are decoded and embedded as Flate-compressed RGB
//! image XObjects, whatever their on-disk format.

use crate::types::*;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::{DynamicImage, ImageReader, RgbImage};
use lopdf::{Dictionary, Object, Stream};
use std::io::Write;
use std::path::Path;

/// Decode the image at `path` and build an image XObject stream for it.
///
/// Any failure to open or decode the file is an `ImagePlacement` error so the
/// caller can skip just this cell.
pub fn create_image_xobject(path: &Path) -> Result<Stream> {
    let placement_error = |reason: String| GalleryError::ImagePlacement {
        path: path.to_owned(),
        reason,
    };

    let image = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| placement_error(e.to_string()))?
        .decode()
        .map_err(|e| placement_error(e.to_string()))?;

    let rgb = flatten_onto_white(image);
    let (width, height) = rgb.dimensions();

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(rgb.as_raw())?;
    let data = encoder.finish()?;

    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(i64::from(width)));
    dict.set("Height", Object::Integer(i64::from(height)));
    dict.set("ColorSpace", Object::Name(b"DeviceRGB".to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));
    dict.set("Filter", Object::Name(b"FlateDecode".to_vec()));

    Ok(Stream::new(dict, data).with_compression(false))
}

/// Drop alpha by compositing over a white background
pub(crate) fn flatten_onto_white(image: DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = u16::from(a);
        let blend = |c: u8| ((u16::from(c) * alpha + 255 * (255 - alpha)) / 255) as u8;
        image::Rgb([blend(r), blend(g), blend(b)])
    })
}
