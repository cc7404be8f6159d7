use crate::index::IndexManager;
use crate::error::Result;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    pub total_documents: u64,
    pub deleted_documents: u64,
    pub segments: usize,
}

pub fn get_stats(manager: &IndexManager) -> Result<IndexStats> {
    let reader = manager.reader()?;
    let searcher = reader.searcher();

    let deleted_documents = searcher
        .segment_readers()
        .iter()
        .map(|segment| u64::from(segment.num_deleted_docs()))
        .sum();

    Ok(IndexStats {
        total_documents: searcher.num_docs(),
        deleted_documents,
        segments: searcher.segment_readers().len(),
    })
}
