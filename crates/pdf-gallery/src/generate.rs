//! Parallel generation of intermediate documents
//!
//! Every chunk is built in its own blocking task. Results are gathered in
//! completion order and re-sorted by sequence index, so the order callers
//! see never depends on scheduling.

use crate::document::ChunkBuilder;
use crate::types::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Per-chunk task outcome; `None` means the build never started
type ChunkOutcome = (usize, Option<Result<IntermediateDocument>>);

/// Build one intermediate document per chunk, concurrently.
///
/// At most `max_concurrent` builds run at once (`None` = all chunks). Waits
/// for every task before returning. If any build fails, builds that have not
/// started yet are skipped, running ones finish, and the failure with the
/// lowest sequence index is returned as `DocumentWrite`.
///
/// On success the documents are ordered by ascending sequence index.
pub async fn generate_documents<B>(
    chunks: Vec<Chunk>,
    builder: Arc<B>,
    max_concurrent: Option<usize>,
) -> Result<Vec<IntermediateDocument>>
where
    B: ChunkBuilder + ?Sized + 'static,
{
    if chunks.is_empty() {
        return Ok(Vec::new());
    }

    let permits = max_concurrent.unwrap_or(chunks.len()).max(1);
    let semaphore = Arc::new(Semaphore::new(permits));
    let failed = Arc::new(AtomicBool::new(false));
    let mut tasks = JoinSet::new();

    log::info!(
        "Generating {} documents ({} at a time)",
        chunks.len(),
        permits
    );

    for chunk in chunks {
        let builder = Arc::clone(&builder);
        let semaphore = Arc::clone(&semaphore);
        let failed = Arc::clone(&failed);

        tasks.spawn(async move { run_chunk(chunk, builder, semaphore, failed).await });
    }

    // Barrier: drain every task, even after a failure
    let mut outcomes: Vec<ChunkOutcome> = Vec::new();
    let mut join_error = None;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => {
                join_error.get_or_insert(e);
            }
        }
    }
    if let Some(e) = join_error {
        return Err(e.into());
    }

    outcomes.sort_by_key(|(index, _)| *index);

    let mut documents = Vec::with_capacity(outcomes.len());
    let mut first_error = None;
    for (index, outcome) in outcomes {
        match outcome {
            Some(Ok(document)) => documents.push(document),
            Some(Err(e)) => {
                log::error!("Chunk {} failed: {}", index, e);
                first_error.get_or_insert((index, e));
            }
            None => log::debug!("Chunk {} skipped after an earlier failure", index),
        }
    }

    match first_error {
        Some((_, e @ GalleryError::DocumentWrite { .. })) => Err(e),
        Some((index, e)) => Err(GalleryError::DocumentWrite {
            index,
            reason: e.to_string(),
        }),
        None => Ok(documents),
    }
}

async fn run_chunk<B>(
    chunk: Chunk,
    builder: Arc<B>,
    semaphore: Arc<Semaphore>,
    failed: Arc<AtomicBool>,
) -> ChunkOutcome
where
    B: ChunkBuilder + ?Sized + 'static,
{
    let index = chunk.index;

    let _permit = match semaphore.acquire_owned().await {
        Ok(permit) => permit,
        Err(e) => {
            return (
                index,
                Some(Err(GalleryError::DocumentWrite {
                    index,
                    reason: e.to_string(),
                })),
            );
        }
    };

    if failed.load(Ordering::SeqCst) {
        return (index, None);
    }

    log::debug!("Chunk {}: building {} images", index, chunk.len());
    let result = match tokio::task::spawn_blocking(move || builder.build(&chunk)).await {
        Ok(result) => result,
        Err(e) => Err(GalleryError::TaskJoin(e)),
    };

    if result.is_err() {
        failed.store(true, Ordering::SeqCst);
    }

    (index, Some(result))
}
