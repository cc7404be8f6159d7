use std::time::Instant;

use crate::error::{PurgeError, Result};
use crate::purge::{
    BatchIndex, DocumentDeleteHandler, MatchEvent, MatchHandler, SearchIndex,
    DEFAULT_DELETE_BATCH_SIZE,
};

/// Deletes every document matching a query, in bounded batches.
///
/// The running total survives across calls on the same coordinator; build a
/// new one for per-call counts. Calls block until the index has streamed all
/// matches or failed. A failed call can be re-run with the same query, since
/// deleting an already deleted identifier is a no-op.
pub struct DeleteByQuery<'a, I: ?Sized> {
    index: &'a I,
    batch_size: usize,
    total_deleted: usize,
}

impl<'a, I> DeleteByQuery<'a, I>
where
    I: SearchIndex + BatchIndex + ?Sized,
{
    pub fn new(index: &'a I) -> Self {
        Self::with_batch_size(index, DEFAULT_DELETE_BATCH_SIZE)
    }

    pub fn with_batch_size(index: &'a I, batch_size: usize) -> Self {
        Self {
            index,
            batch_size: batch_size.max(1),
            total_deleted: 0,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Documents confirmed deleted by this coordinator so far.
    pub fn total_deleted(&self) -> usize {
        self.total_deleted
    }

    /// Runs `query` and deletes every match. Returns the running total.
    ///
    /// On failure the error carries the query and the total reached before
    /// the failing batch; documents of that batch are not counted.
    pub fn delete_by_query(&mut self, query: &I::Query) -> Result<usize> {
        let start = Instant::now();
        let index = self.index;
        let batch_size = self.batch_size;
        metrics::counter!("purge_delete_by_query_total").increment(1);

        let mut handler = DocumentDeleteHandler::new(index, batch_size, &mut self.total_deleted);
        let outcome = index
            .search_matches(query, &mut handler)
            .and_then(|()| {
                if handler.is_finished() {
                    return Ok(());
                }
                tracing::warn!(
                    "Match stream ended without an end signal, flushing {} pending deletions",
                    handler.pending()
                );
                handler.on_match(MatchEvent::End)
            });
        let flushes = handler.flushes();
        drop(handler);

        metrics::histogram!("purge_delete_by_query_duration_seconds")
            .record(start.elapsed().as_secs_f64());

        match outcome {
            Ok(()) => {
                tracing::info!(
                    "Delete by query {:?} finished: {} batches, {} documents deleted in {:?}",
                    query,
                    flushes,
                    self.total_deleted,
                    start.elapsed()
                );
                Ok(self.total_deleted)
            }
            Err(e) => {
                tracing::warn!(
                    "Delete by query {:?} failed after {} documents: {}",
                    query,
                    self.total_deleted,
                    e
                );
                Err(PurgeError::DeleteByQuery {
                    query: format!("{:?}", query),
                    deleted: self.total_deleted,
                    source: Box::new(e),
                })
            }
        }
    }
}
