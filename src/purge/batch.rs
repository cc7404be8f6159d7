use std::collections::HashSet;

use crate::error::Result;
use crate::purge::BatchIndex;

/// Pending deletions keyed by document identifier.
///
/// Deleting the same identifier twice before a flush leaves a single
/// pending operation.
#[derive(Debug, Default, Clone)]
pub struct DeleteBatch {
    pending: HashSet<String>,
}

impl DeleteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pending: HashSet::with_capacity(capacity),
        }
    }

    pub fn delete(&mut self, document_id: &str) {
        if !self.pending.contains(document_id) {
            self.pending.insert(document_id.to_string());
        }
    }

    pub fn size(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn contains(&self, document_id: &str) -> bool {
        self.pending.contains(document_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.pending.iter().map(String::as_str)
    }

    pub fn reset(&mut self) {
        self.pending.clear();
    }

    /// Submits the pending deletions to `index` and clears the batch.
    ///
    /// An empty batch is not sent. On error the pending deletions are kept.
    pub fn flush<I>(&mut self, index: &I) -> Result<usize>
    where
        I: BatchIndex + ?Sized,
    {
        if self.is_empty() {
            return Ok(0);
        }

        let applied = index.apply_batch(self)?;
        self.reset();
        Ok(applied)
    }
}
