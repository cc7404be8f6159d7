#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    use crate::error::{PurgeError, Result};
    use crate::index::document::{add_documents, document_exists, get_document};
    use crate::index::manager::IndexManager;
    use crate::index::schema::{scope_collection_tag, IndexSchema, DOCUMENT_ID_FIELD, SCOPE_COLLECTION_FIELD};
    use tantivy::schema::{Schema, STORED, STRING, TEXT};
    use tantivy::Index;
    use crate::index::search::DeleteQuery;
    use crate::index::stats::get_stats;
    use crate::purge::{BatchIndex, DeleteBatch, DeleteByQuery, MatchHandler, SearchIndex};

    /// Records the size of every batch reaching the index.
    struct RecordingIndex<'a> {
        inner: &'a IndexManager,
        flushes: RefCell<Vec<usize>>,
    }

    impl<'a> RecordingIndex<'a> {
        fn new(inner: &'a IndexManager) -> Self {
            Self {
                inner,
                flushes: RefCell::new(Vec::new()),
            }
        }
    }

    impl SearchIndex for RecordingIndex<'_> {
        type Query = dyn tantivy::query::Query;

        fn search_matches(&self, query: &Self::Query, handler: &mut dyn MatchHandler) -> Result<()> {
            self.inner.search_matches(query, handler)
        }
    }

    impl BatchIndex for RecordingIndex<'_> {
        fn apply_batch(&self, batch: &DeleteBatch) -> Result<usize> {
            let applied = self.inner.apply_batch(batch)?;
            self.flushes.borrow_mut().push(applied);
            Ok(applied)
        }
    }

    fn create_test_manager() -> (TempDir, IndexManager) {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("test_index");

        if !path.exists() {
            fs::create_dir_all(&path).unwrap();
        }

        let manager = IndexManager::create(&path).unwrap();

        (temp_dir, manager)
    }

    fn docs(ids: impl Iterator<Item = usize>, scope: &str, collection: &str) -> Vec<(String, HashMap<String, String>)> {
        ids.map(|id| {
            let mut fields = HashMap::new();
            fields.insert(SCOPE_COLLECTION_FIELD.to_string(), scope_collection_tag(scope, collection));
            fields.insert("title".to_string(), format!("Document {}", id));
            fields.insert("content".to_string(), format!("Content for document {}", id));
            (format!("d{}", id), fields)
        })
        .collect()
    }

    #[test]
    fn test_index_manager_open() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("test_index");

        {
            fs::create_dir_all(&path).unwrap();
            let manager = IndexManager::create(&path).unwrap();
            add_documents(&manager, docs(1..=3, "s", "c")).unwrap();
        }

        let manager = IndexManager::open(&path).unwrap();
        assert_eq!(manager.num_docs().unwrap(), 3);
    }

    #[test]
    fn test_open_or_create_creates_directory() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("index");

        let manager = IndexManager::open_or_create(&path, 50_000_000).unwrap();
        assert!(path.exists());
        assert_eq!(manager.num_docs().unwrap(), 0);
    }

    #[test]
    fn test_document_get() {
        let (_temp_dir, manager) = create_test_manager();
        add_documents(&manager, docs(1..=2, "s", "c")).unwrap();

        assert!(get_document(&manager, "d1").unwrap().is_some());
        assert!(get_document(&manager, "d9").unwrap().is_none());
    }

    #[test]
    fn test_apply_batch_deletes_by_id() {
        let manager = IndexManager::create_in_ram().unwrap();
        add_documents(&manager, docs(1..=4, "s", "c")).unwrap();

        let mut batch = DeleteBatch::new();
        batch.delete("d1");
        batch.delete("d3");
        batch.delete("missing");

        assert_eq!(batch.flush(&manager).unwrap(), 3);
        assert!(!document_exists(&manager, "d1").unwrap());
        assert!(document_exists(&manager, "d2").unwrap());
        assert!(!document_exists(&manager, "d3").unwrap());
        assert_eq!(manager.num_docs().unwrap(), 2);
    }

    #[test]
    fn test_delete_all_in_batches() {
        let manager = IndexManager::create_in_ram().unwrap();
        add_documents(&manager, docs(1..=12_000, "s", "c")).unwrap();
        let recording = RecordingIndex::new(&manager);

        let query = DeleteQuery::All.build(manager.schema()).unwrap();
        let mut purge = DeleteByQuery::with_batch_size(&recording, 5000);
        let total = purge.delete_by_query(&*query).unwrap();

        assert_eq!(total, 12_000);
        assert_eq!(*recording.flushes.borrow(), vec![5000, 5000, 2000]);
        assert_eq!(manager.num_docs().unwrap(), 0);
        assert!(!document_exists(&manager, "d1").unwrap());
        assert!(!document_exists(&manager, "d12000").unwrap());
    }

    #[test]
    fn test_delete_scope_collection_leaves_others() {
        let (_temp_dir, manager) = create_test_manager();
        add_documents(&manager, docs(1..=30, "inventory", "airline")).unwrap();
        add_documents(&manager, docs(31..=40, "inventory", "hotel")).unwrap();

        let query = DeleteQuery::ScopeCollection {
            scope: "inventory".to_string(),
            collection: "airline".to_string(),
        }
        .build(manager.schema())
        .unwrap();
        let mut purge = DeleteByQuery::with_batch_size(&manager, 7);

        assert_eq!(purge.delete_by_query(&*query).unwrap(), 30);
        assert_eq!(manager.num_docs().unwrap(), 10);
        assert!(document_exists(&manager, "d31").unwrap());

        let stats = get_stats(&manager).unwrap();
        assert_eq!(stats.total_documents, 10);
    }

    #[test]
    fn test_delete_by_query_is_idempotent() {
        let manager = IndexManager::create_in_ram().unwrap();
        add_documents(&manager, docs(1..=20, "s", "c")).unwrap();
        let query = DeleteQuery::Term {
            field: SCOPE_COLLECTION_FIELD.to_string(),
            value: scope_collection_tag("s", "c"),
        }
        .build(manager.schema())
        .unwrap();

        let mut first = DeleteByQuery::new(&manager);
        assert_eq!(first.delete_by_query(&*query).unwrap(), 20);

        let recording = RecordingIndex::new(&manager);
        let mut second = DeleteByQuery::new(&recording);
        assert_eq!(second.delete_by_query(&*query).unwrap(), 0);
        assert!(recording.flushes.borrow().is_empty());
    }

    #[test]
    fn test_match_query_deletes_matching_text() {
        let manager = IndexManager::create_in_ram().unwrap();
        let mut rust = HashMap::new();
        rust.insert("title".to_string(), "Rust Programming".to_string());
        rust.insert("content".to_string(), "Rust is a systems programming language".to_string());
        let mut ts = HashMap::new();
        ts.insert("title".to_string(), "TypeScript Guide".to_string());
        ts.insert("content".to_string(), "TypeScript is a typed superset of JavaScript".to_string());
        add_documents(&manager, vec![("1".to_string(), rust), ("2".to_string(), ts)]).unwrap();

        let query = DeleteQuery::Match { text: "rust".to_string() }
            .build(manager.schema())
            .unwrap();
        let mut purge = DeleteByQuery::new(&manager);

        assert_eq!(purge.delete_by_query(&*query).unwrap(), 1);
        assert!(!document_exists(&manager, "1").unwrap());
        assert!(document_exists(&manager, "2").unwrap());
    }

    #[test]
    fn test_empty_match_query_deletes_nothing() {
        let manager = IndexManager::create_in_ram().unwrap();
        add_documents(&manager, docs(1..=3, "s", "c")).unwrap();

        let query = DeleteQuery::Match { text: "   ".to_string() }
            .build(manager.schema())
            .unwrap();
        let mut purge = DeleteByQuery::new(&manager);

        assert_eq!(purge.delete_by_query(&*query).unwrap(), 0);
        assert_eq!(manager.num_docs().unwrap(), 3);
    }

    #[test]
    fn test_term_query_rejects_unknown_field() {
        let manager = IndexManager::create_in_ram().unwrap();
        let result = DeleteQuery::Term {
            field: "title".to_string(),
            value: "x".to_string(),
        }
        .build(manager.schema());

        assert!(matches!(result, Err(PurgeError::InvalidQuery(_))));
    }

    #[test]
    fn test_delete_query_json_shape() {
        let query: DeleteQuery = serde_json::from_str(
            r#"{"type": "scope_collection", "scope": "inventory", "collection": "hotel"}"#,
        )
        .unwrap();

        assert_eq!(
            query,
            DeleteQuery::ScopeCollection {
                scope: "inventory".to_string(),
                collection: "hotel".to_string(),
            }
        );
        assert_eq!(scope_collection_tag("inventory", "hotel"), "_$inventory_$hotel");
    }

    #[test]
    fn test_document_id_is_a_fast_field() {
        let manager = IndexManager::create_in_ram().unwrap();
        let schema = manager.schema();

        assert!(schema.schema().get_field_entry(schema.document_id).is_fast());
    }

    #[test]
    fn test_streams_ids_from_doc_store_without_fast_column() {
        let mut builder = Schema::builder();
        builder.add_text_field(DOCUMENT_ID_FIELD, STRING | STORED);
        builder.add_text_field(SCOPE_COLLECTION_FIELD, STRING | STORED);
        builder.add_text_field("title", TEXT | STORED);
        builder.add_text_field("content", TEXT | STORED);
        let index = Index::create_in_ram(builder.build());
        let schema = IndexSchema::from_schema(index.schema()).unwrap();
        let manager = IndexManager::with_index(index, schema, 50_000_000).unwrap();
        add_documents(&manager, docs(1..=11, "s", "c")).unwrap();
        let recording = RecordingIndex::new(&manager);

        let query = DeleteQuery::All.build(manager.schema()).unwrap();
        let mut purge = DeleteByQuery::with_batch_size(&recording, 5);

        assert_eq!(purge.delete_by_query(&*query).unwrap(), 11);
        assert_eq!(*recording.flushes.borrow(), vec![5, 5, 1]);
        assert_eq!(manager.num_docs().unwrap(), 0);
    }
}
