//! Merging intermediate documents into the final PDF

use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::path::{Path, PathBuf};

/// Accumulates pages from several documents under one page tree
pub struct PdfCombiner {
    doc: Document,
    pages_id: ObjectId,
    kids: Vec<ObjectId>,
}

impl Default for PdfCombiner {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfCombiner {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            kids: Vec::new(),
        }
    }

    /// Parse a serialized document so its pages can be appended
    pub fn load_pages(bytes: &[u8]) -> Result<Document> {
        Ok(Document::load_mem(bytes)?)
    }

    /// Append every page of `source`, keeping their order. Returns the
    /// number of pages appended.
    pub fn append_pages(&mut self, mut source: Document) -> usize {
        source.renumber_objects_with(self.doc.max_id + 1);

        // get_pages is keyed by page number, so this is reading order
        let page_ids: Vec<ObjectId> = source.get_pages().into_values().collect();
        let source_max_id = source.max_id;

        for (object_id, object) in source.objects {
            let skip = matches!(
                object.type_name().unwrap_or(b""),
                b"Catalog" | b"Pages" | b"Outlines" | b"Outline"
            );
            if !skip {
                self.doc.objects.insert(object_id, object);
            }
        }

        for &page_id in &page_ids {
            if let Some(Object::Dictionary(page)) = self.doc.objects.get_mut(&page_id) {
                page.set("Parent", Object::Reference(self.pages_id));
            }
        }

        self.doc.max_id = self.doc.max_id.max(source_max_id);
        self.kids.extend_from_slice(&page_ids);
        page_ids.len()
    }

    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Close the page tree and serialize
    pub fn save(mut self) -> Result<Vec<u8>> {
        let kids: Vec<Object> = self.kids.iter().map(|&id| Object::Reference(id)).collect();
        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(self.kids.len() as i64)),
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

/// Summary of a completed merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSummary {
    pub output_path: PathBuf,
    pub documents: usize,
    pub pages: usize,
}

/// Merge `documents` in sequence-index order into `output_path`.
///
/// The merged page count must equal the sum of the documents' recorded page
/// counts. The output is written to a `.part` sibling and renamed into place,
/// so `output_path` only appears once the merge has fully succeeded.
pub async fn merge_documents(
    documents: &[IntermediateDocument],
    output_path: impl AsRef<Path>,
) -> Result<MergeSummary> {
    let output_path = output_path.as_ref().to_owned();
    let mut documents = documents.to_vec();
    documents.sort_by_key(|doc| doc.index);

    let merge_error = |path: &Path, reason: String| GalleryError::Merge {
        path: path.to_owned(),
        reason,
    };

    let target = output_path.clone();
    let (bytes, document_count, page_count) = tokio::task::spawn_blocking(move || {
        let mut combiner = PdfCombiner::new();

        for document in &documents {
            let bytes = std::fs::read(&document.path)
                .map_err(|e| merge_error(&document.path, e.to_string()))?;
            let source = PdfCombiner::load_pages(&bytes)
                .map_err(|e| merge_error(&document.path, e.to_string()))?;
            let appended = combiner.append_pages(source);
            log::debug!(
                "Appended {} pages from chunk {} ({})",
                appended,
                document.index,
                document.path.display()
            );
        }

        let page_count = combiner.page_count();
        let expected: usize = documents.iter().map(|doc| doc.page_count).sum();
        if page_count != expected {
            return Err(merge_error(
                &target,
                format!(
                    "merged {} pages but intermediate documents hold {}",
                    page_count, expected
                ),
            ));
        }

        let bytes = combiner
            .save()
            .map_err(|e| merge_error(&target, e.to_string()))?;
        Ok::<_, GalleryError>((bytes, documents.len(), page_count))
    })
    .await??;

    if let Some(parent) = output_path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| merge_error(&output_path, e.to_string()))?;
    }

    let partial = partial_path(&output_path);
    tokio::fs::write(&partial, &bytes)
        .await
        .map_err(|e| merge_error(&output_path, e.to_string()))?;
    tokio::fs::rename(&partial, &output_path)
        .await
        .map_err(|e| merge_error(&output_path, e.to_string()))?;

    Ok(MergeSummary {
        output_path,
        documents: document_count,
        pages: page_count,
    })
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}
