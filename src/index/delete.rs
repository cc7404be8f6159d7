use crate::error::{PurgeError, Result};
use crate::index::IndexManager;
use crate::purge::{BatchIndex, DeleteBatch};
use tantivy::{Opstamp, TantivyError, Term};

impl BatchIndex for IndexManager {
    /// One `delete_term` per identifier and a single commit, so the batch
    /// becomes visible to new readers all at once.
    fn apply_batch(&self, batch: &DeleteBatch) -> Result<usize> {
        let field = self.schema().document_id;
        self.with_writer(|writer| {
            for document_id in batch.ids() {
                writer.delete_term(Term::from_field_text(field, document_id));
            }

            if let Err(e) = writer.commit() {
                return Err(commit_failure(e, writer.rollback()));
            }
            Ok(batch.size())
        })
    }
}

/// The commit error is what the caller sees; a failed rollback is only logged.
pub(crate) fn commit_failure(commit: TantivyError, rollback: tantivy::Result<Opstamp>) -> PurgeError {
    if let Err(e) = rollback {
        tracing::warn!("Rollback after failed delete commit also failed: {}", e);
    }
    PurgeError::TantivyError(commit)
}
