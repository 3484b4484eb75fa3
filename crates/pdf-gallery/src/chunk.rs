//! Partitioning normalized images into per-document chunks

use crate::types::{Chunk, NormalizedImage};

/// Split `images` into chunks of at most `capacity`, numbered from 1.
///
/// Order is preserved: concatenating the chunks by index gives back `images`.
/// A zero capacity is treated as 1.
pub fn partition(images: &[NormalizedImage], capacity: usize) -> Vec<Chunk> {
    images
        .chunks(capacity.max(1))
        .enumerate()
        .map(|(i, group)| Chunk {
            index: i + 1,
            images: group.to_vec(),
        })
        .collect()
}

/// Number of chunks `partition` produces for `count` images
pub fn chunk_count(count: usize, capacity: usize) -> usize {
    count.div_ceil(capacity.max(1))
}
