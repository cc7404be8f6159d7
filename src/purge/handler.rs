use crate::error::Result;
use crate::purge::{BatchIndex, DeleteBatch, MatchEvent, MatchHandler};

/// Turns a match stream into batched deletions.
///
/// Flushes whenever the batch reaches `batch_size` and once more when the
/// stream ends, adding each confirmed flush to the shared running total.
pub struct DocumentDeleteHandler<'a, I: ?Sized> {
    index: &'a I,
    batch: DeleteBatch,
    batch_size: usize,
    total_deleted: &'a mut usize,
    flushes: usize,
    finished: bool,
}

impl<'a, I> DocumentDeleteHandler<'a, I>
where
    I: BatchIndex + ?Sized,
{
    pub fn new(index: &'a I, batch_size: usize, total_deleted: &'a mut usize) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            index,
            batch: DeleteBatch::with_capacity(batch_size),
            batch_size,
            total_deleted,
            flushes: 0,
            finished: false,
        }
    }

    /// Whether the end-of-stream signal has been handled.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Number of non-empty batches flushed so far.
    pub fn flushes(&self) -> usize {
        self.flushes
    }

    pub fn pending(&self) -> usize {
        self.batch.size()
    }

    fn flush(&mut self) -> Result<()> {
        if self.batch.is_empty() {
            return Ok(());
        }

        let size = self.batch.size();
        match self.batch.flush(self.index) {
            Ok(applied) => {
                *self.total_deleted += applied;
                self.flushes += 1;
                metrics::counter!("purge_flushes_total").increment(1);
                metrics::counter!("purge_deleted_documents_total").increment(applied as u64);
                tracing::debug!(
                    "Flushed delete batch #{} of {} documents, {} deleted so far",
                    self.flushes,
                    applied,
                    *self.total_deleted
                );
                Ok(())
            }
            Err(e) => {
                metrics::counter!("purge_flush_errors_total").increment(1);
                tracing::warn!("Delete batch of {} documents failed: {}", size, e);
                Err(e)
            }
        }
    }
}

impl<I> MatchHandler for DocumentDeleteHandler<'_, I>
where
    I: BatchIndex + ?Sized,
{
    fn on_match(&mut self, event: MatchEvent<'_>) -> Result<()> {
        if let MatchEvent::Hit(document_id) = event {
            self.batch.delete(document_id);
        }

        let end_of_stream = event == MatchEvent::End;
        if self.batch.size() >= self.batch_size || end_of_stream {
            self.flush()?;
        }
        if end_of_stream {
            self.finished = true;
        }
        Ok(())
    }
}
