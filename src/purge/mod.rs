//! Streaming delete-by-query.
//!
//! A [`DeleteByQuery`] coordinator runs a query against an index that can
//! both stream its matches ([`SearchIndex`]) and apply delete batches
//! ([`BatchIndex`]). Every match is handed to a [`DocumentDeleteHandler`],
//! which accumulates identifiers in a [`DeleteBatch`] and flushes it when
//! the batch reaches its size threshold and once more at end of stream.
//! The full match set is never held in memory.

pub mod batch;
pub mod coordinator;
pub mod handler;

use std::fmt::Debug;

use crate::error::Result;

pub use batch::DeleteBatch;
pub use coordinator::DeleteByQuery;
pub use handler::DocumentDeleteHandler;

/// Default number of pending deletions per flush.
pub const DEFAULT_DELETE_BATCH_SIZE: usize = 5000;

/// One step of a match stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchEvent<'a> {
    /// A document identifier matched the query.
    Hit(&'a str),
    /// No more matches will follow.
    End,
}

/// Receives the matches of a streaming query.
///
/// Returning an error aborts the stream; the engine must stop calling the
/// handler and surface the error from its search call.
pub trait MatchHandler {
    fn on_match(&mut self, event: MatchEvent<'_>) -> Result<()>;
}

/// Query side of an index: runs a query in streaming mode.
pub trait SearchIndex {
    type Query: ?Sized + Debug;

    /// Calls `handler` once per live match, in engine order, then once with
    /// [`MatchEvent::End`]. Stops at the first handler error and returns it.
    fn search_matches(&self, query: &Self::Query, handler: &mut dyn MatchHandler) -> Result<()>;
}

/// Mutation side of an index.
pub trait BatchIndex {
    /// Applies every pending deletion of `batch` as one request and returns
    /// the number of operations applied. The batch itself is left untouched.
    fn apply_batch(&self, batch: &DeleteBatch) -> Result<usize>;
}
