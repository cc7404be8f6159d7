use crate::index::IndexManager;
use crate::error::Result;
use std::collections::HashMap;
use tantivy::collector::TopDocs;
use tantivy::query::TermQuery;
use tantivy::schema::{IndexRecordOption, TantivyDocument};
use tantivy::Term;

/// Adds `documents` with a single commit. Returns how many were added.
pub fn add_documents(
    manager: &IndexManager,
    documents: Vec<(String, HashMap<String, String>)>,
) -> Result<usize> {
    let count = documents.len();
    let schema = manager.schema();

    manager.with_writer(|writer| {
        for (doc_id, fields) in &documents {
            writer.add_document(schema.to_document(doc_id, fields))?;
        }
        writer.commit()?;
        Ok(())
    })?;

    tracing::debug!("Indexed {} documents", count);
    Ok(count)
}

pub fn get_document(
    manager: &IndexManager,
    document_id: &str,
) -> Result<Option<TantivyDocument>> {
    let reader = manager.reader()?;
    let searcher = reader.searcher();

    let term = Term::from_field_text(manager.schema().document_id, document_id);
    let query = TermQuery::new(term, IndexRecordOption::Basic);
    let results = searcher.search(&query, &TopDocs::with_limit(1))?;

    match results.first() {
        Some((_, doc_address)) => Ok(Some(searcher.doc(*doc_address)?)),
        None => Ok(None),
    }
}

pub fn document_exists(manager: &IndexManager, document_id: &str) -> Result<bool> {
    Ok(get_document(manager, document_id)?.is_some())
}
