//! Page drawing and PDF serialization

use crate::constants::HELVETICA_CHAR_WIDTH_RATIO;
use crate::layout::{Rect, TextAlign};
use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::path::Path;

use super::xobject::create_image_xobject;

/// Drawing surface that the document builder renders layouts onto.
///
/// Coordinates are top-left based; implementations translate them to their
/// own space.
pub trait DocumentWriter {
    /// Start a new page; subsequent drawing goes there
    fn open_page(&mut self, width: f32, height: f32);

    /// Draw the image at `path` stretched to `rect`
    fn place_image(&mut self, path: &Path, rect: &Rect) -> Result<()>;

    /// Draw one line of text inside `rect`
    fn place_text(&mut self, text: &str, rect: &Rect, align: TextAlign, font_size: f32);

    fn page_count(&self) -> usize;

    /// Serialize the document
    fn finalize(self) -> Result<Vec<u8>>
    where
        Self: Sized;
}

/// Page under construction
struct PageBuilder {
    width: f32,
    height: f32,
    content_ops: Vec<String>,
    xobjects: Dictionary,
}

/// [`DocumentWriter`] producing a PDF with lopdf
pub struct PdfWriter {
    doc: Document,
    pages_id: ObjectId,
    font_id: ObjectId,
    page_ids: Vec<ObjectId>,
    current: Option<PageBuilder>,
    image_count: usize,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let mut font_dict = Dictionary::new();
        font_dict.set("Type", Object::Name(b"Font".to_vec()));
        font_dict.set("Subtype", Object::Name(b"Type1".to_vec()));
        font_dict.set("BaseFont", Object::Name(b"Helvetica".to_vec()));
        let font_id = doc.add_object(font_dict);

        Self {
            doc,
            pages_id,
            font_id,
            page_ids: Vec::new(),
            current: None,
            image_count: 0,
        }
    }

    /// Write the page under construction into the document
    fn flush_page(&mut self) {
        let Some(page) = self.current.take() else {
            return;
        };

        let mut fonts = Dictionary::new();
        fonts.set("F1", Object::Reference(self.font_id));

        let mut resources = Dictionary::new();
        resources.set("XObject", Object::Dictionary(page.xobjects));
        resources.set("Font", Object::Dictionary(fonts));

        let content = page.content_ops.join("");
        let content_id = self
            .doc
            .add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let mut page_dict = Dictionary::new();
        page_dict.set("Type", Object::Name(b"Page".to_vec()));
        page_dict.set("Parent", Object::Reference(self.pages_id));
        page_dict.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(page.width),
                Object::Real(page.height),
            ]),
        );
        page_dict.set("Contents", Object::Reference(content_id));
        page_dict.set("Resources", Object::Dictionary(resources));

        let page_id = self.doc.add_object(page_dict);
        self.page_ids.push(page_id);
    }
}

impl DocumentWriter for PdfWriter {
    fn open_page(&mut self, width: f32, height: f32) {
        self.flush_page();
        self.current = Some(PageBuilder {
            width,
            height,
            content_ops: Vec::new(),
            xobjects: Dictionary::new(),
        });
    }

    fn place_image(&mut self, path: &Path, rect: &Rect) -> Result<()> {
        let Some(page) = self.current.as_mut() else {
            return Err(GalleryError::ImagePlacement {
                path: path.to_owned(),
                reason: "no page is open".to_string(),
            });
        };

        let stream = create_image_xobject(path)?;
        let xobject_id = self.doc.add_object(stream);

        self.image_count += 1;
        let name = format!("Im{}", self.image_count);
        page.xobjects
            .set(name.as_bytes(), Object::Reference(xobject_id));

        // Image space is the unit square; scale it to the rect
        let pdf_y = page.height - rect.bottom();
        page.content_ops.push(format!(
            "q {} 0 0 {} {} {} cm /{} Do Q\n",
            rect.width, rect.height, rect.x, pdf_y, name
        ));

        Ok(())
    }

    fn place_text(&mut self, text: &str, rect: &Rect, align: TextAlign, font_size: f32) {
        let Some(page) = self.current.as_mut() else {
            return;
        };

        let line = fit_text(text, rect.width, font_size);
        if line.is_empty() {
            return;
        }

        let text_width = estimate_text_width(&line, font_size);
        let text_x = match align {
            TextAlign::Left => rect.x,
            TextAlign::Center => rect.center_x() - text_width / 2.0,
            TextAlign::Right => rect.right() - text_width,
        };
        // Baseline roughly centred in the slot
        let baseline = rect.y + (rect.height + font_size * 0.7) / 2.0;
        let text_y = page.height - baseline;

        page.content_ops.push(format!(
            "BT /F1 {} Tf {} {} Td ({}) Tj ET\n",
            font_size,
            text_x,
            text_y,
            escape_pdf_string(&line)
        ));
    }

    fn page_count(&self) -> usize {
        self.page_ids.len() + usize::from(self.current.is_some())
    }

    fn finalize(mut self) -> Result<Vec<u8>> {
        self.flush_page();

        let kids: Vec<Object> = self
            .page_ids
            .iter()
            .map(|&id| Object::Reference(id))
            .collect();
        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(self.page_ids.len() as i64)),
        ]);
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages_dict));

        let catalog_id = self.doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_id)),
        ]));
        self.doc.trailer.set("Root", catalog_id);

        let mut writer = Vec::new();
        self.doc.save_to(&mut writer)?;
        Ok(writer)
    }
}

// =============================================================================
// Text Helpers
// =============================================================================

/// Approximate Helvetica width of `text` in points
pub fn estimate_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * HELVETICA_CHAR_WIDTH_RATIO
}

/// Restrict to printable ASCII and truncate with "..." to fit `max_width`
pub fn fit_text(text: &str, max_width: f32, font_size: f32) -> String {
    let cleaned: String = text
        .chars()
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '?' })
        .collect();

    let char_width = font_size * HELVETICA_CHAR_WIDTH_RATIO;
    if char_width <= 0.0 {
        return cleaned;
    }

    let max_chars = (max_width / char_width).floor().max(0.0) as usize;
    if cleaned.len() <= max_chars {
        return cleaned;
    }
    if max_chars <= 3 {
        return cleaned.chars().take(max_chars).collect();
    }

    let mut truncated: String = cleaned.chars().take(max_chars - 3).collect();
    truncated.push_str("...");
    truncated
}

/// Escape a PDF literal string body
fn escape_pdf_string(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '(' | ')' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
