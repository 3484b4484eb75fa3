use lopdf::{Dictionary, Document, Object, Stream};
use pdf_gallery::*;
use std::path::Path;
use tempfile::TempDir;

/// Document whose pages are `width` points wide, so their origin is visible
fn create_test_pdf(num_pages: usize, width: i64) -> Document {
    let mut doc = Document::with_version("1.7");

    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for _ in 0..num_pages {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), b"q Q".to_vec()));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(width),
                    Object::Integer(800),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(num_pages as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));

    doc.trailer.set("Root", catalog_id);

    doc
}

fn save_intermediate(dir: &Path, index: usize, pages: usize) -> IntermediateDocument {
    let mut doc = create_test_pdf(pages, 100 * index as i64);
    let path = dir.join(format!("chunk-{:04}.pdf", index));
    doc.save(&path).unwrap();
    IntermediateDocument {
        index,
        path,
        page_count: pages,
    }
}

fn page_widths(path: &Path) -> Vec<i64> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .values()
        .map(|&id| {
            let page = doc.get_dictionary(id).unwrap();
            let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
            media_box[2].as_i64().unwrap()
        })
        .collect()
}

#[tokio::test]
async fn test_merge_concatenates_in_index_order() {
    let dir = TempDir::new().unwrap();
    // Deliberately out of order
    let documents = vec![
        save_intermediate(dir.path(), 3, 1),
        save_intermediate(dir.path(), 1, 2),
        save_intermediate(dir.path(), 2, 3),
    ];
    let output = dir.path().join("out").join("final.pdf");

    let summary = merge_documents(&documents, &output).await.unwrap();

    assert_eq!(summary.documents, 3);
    assert_eq!(summary.pages, 6);
    assert_eq!(summary.output_path, output);
    assert_eq!(
        page_widths(&output),
        vec![100, 100, 200, 200, 200, 300]
    );
    assert!(!dir.path().join("out").join("final.pdf.part").exists());
}

#[tokio::test]
async fn test_merge_single_document() {
    let dir = TempDir::new().unwrap();
    let documents = vec![save_intermediate(dir.path(), 1, 4)];
    let output = dir.path().join("final.pdf");

    let summary = merge_documents(&documents, &output).await.unwrap();

    assert_eq!(summary.pages, 4);
    assert_eq!(Document::load(&output).unwrap().get_pages().len(), 4);
}

#[tokio::test]
async fn test_missing_document_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let mut documents = vec![save_intermediate(dir.path(), 1, 1)];
    documents.push(IntermediateDocument {
        index: 2,
        path: dir.path().join("chunk-0002.pdf"),
        page_count: 1,
    });
    let output = dir.path().join("final.pdf");

    let result = merge_documents(&documents, &output).await;

    match result {
        Err(GalleryError::Merge { path, .. }) => {
            assert_eq!(path, dir.path().join("chunk-0002.pdf"))
        }
        other => panic!("Expected Merge error, got {:?}", other),
    }
    assert!(!output.exists());
}

#[tokio::test]
async fn test_page_count_mismatch_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let mut documents = vec![
        save_intermediate(dir.path(), 1, 2),
        save_intermediate(dir.path(), 2, 1),
    ];
    // Recorded count disagrees with the pages actually in the file
    documents[1].page_count = 2;
    let output = dir.path().join("final.pdf");

    let result = merge_documents(&documents, &output).await;

    match result {
        Err(GalleryError::Merge { path, reason }) => {
            assert_eq!(path, output);
            assert!(reason.contains("3 pages"));
        }
        other => panic!("Expected Merge error, got {:?}", other),
    }
    assert!(!output.exists());
    assert!(!dir.path().join("final.pdf.part").exists());
}

#[tokio::test]
async fn test_corrupt_document_is_merge_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chunk-0001.pdf");
    std::fs::write(&path, b"%PDF-1.7 garbage").unwrap();
    let documents = vec![IntermediateDocument {
        index: 1,
        path,
        page_count: 1,
    }];

    let result = merge_documents(&documents, dir.path().join("final.pdf")).await;
    assert!(matches!(result, Err(GalleryError::Merge { .. })));
}

#[test]
fn test_combiner_appends_pages() {
    let mut combiner = PdfCombiner::new();
    assert_eq!(combiner.append_pages(create_test_pdf(2, 100)), 2);
    assert_eq!(combiner.append_pages(create_test_pdf(3, 200)), 3);
    assert_eq!(combiner.page_count(), 5);

    let bytes = combiner.save().unwrap();
    let merged = PdfCombiner::load_pages(&bytes).unwrap();
    assert_eq!(merged.get_pages().len(), 5);
}
