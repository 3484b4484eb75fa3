//! Turn a folder of images into one paginated PDF contact sheet.
//!
//! Images are normalized, grouped into chunks, laid out on a fixed grid with
//! a caption under each, rendered to one intermediate PDF per chunk in
//! parallel, and merged in order into a single document.

pub mod chunk;
pub mod constants;
pub mod document;
pub mod generate;
pub mod layout;
pub mod merge;
pub mod normalize;
mod options;
pub mod pipeline;
pub mod render;
pub mod storage;
mod types;

pub use chunk::partition;
pub use document::{ChunkBuilder, PdfChunkBuilder};
pub use generate::generate_documents;
pub use merge::{MergeSummary, PdfCombiner, merge_documents};
pub use normalize::{NormalizeReport, normalize_all, normalize_image};
pub use options::*;
pub use pipeline::{run, run_to, run_with_builder};
pub use types::*;
