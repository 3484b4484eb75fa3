//! PDF rendering for gallery pages
//!
//! This module handles all PDF-specific drawing:
//! - Embedding decoded images as XObjects
//! - Writing captions
//! - Serializing pages into a document

mod writer;
mod xobject;

pub use writer::*;
pub use xobject::create_image_xobject;
pub(crate) use xobject::flatten_onto_white;
