use tantivy::{
    directory::MmapDirectory,
    Index, IndexReader, IndexWriter, ReloadPolicy,
};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::Result;
use crate::index::IndexSchema;

const DEFAULT_WRITER_HEAP_BYTES: usize = 50_000_000;

/// Handle on an open, mutable index.
///
/// tantivy allows one writer per index, so the writer is created once and
/// shared behind a mutex by every mutation going through this handle.
#[derive(Clone)]
pub struct IndexManager {
    index: Index,
    schema: IndexSchema,
    writer: Arc<Mutex<IndexWriter>>,
}

impl IndexManager {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let schema = IndexSchema::new();
        let index = Index::create_in_dir(path, schema.schema())?;
        Self::with_index(index, schema, DEFAULT_WRITER_HEAP_BYTES)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let index = Index::open_in_dir(path)?;
        let schema = IndexSchema::from_schema(index.schema())?;
        Self::with_index(index, schema, DEFAULT_WRITER_HEAP_BYTES)
    }

    /// Opens the index at `path`, creating it (and the directory) if needed.
    pub fn open_or_create<P: AsRef<Path>>(path: P, writer_heap_bytes: usize) -> Result<Self> {
        std::fs::create_dir_all(path.as_ref())?;
        let directory = MmapDirectory::open(path.as_ref()).map_err(tantivy::TantivyError::from)?;
        let index = Index::open_or_create(directory, IndexSchema::new().schema())?;
        let schema = IndexSchema::from_schema(index.schema())?;
        Self::with_index(index, schema, writer_heap_bytes)
    }

    pub fn create_in_ram() -> Result<Self> {
        let schema = IndexSchema::new();
        let index = Index::create_in_ram(schema.schema());
        Self::with_index(index, schema, DEFAULT_WRITER_HEAP_BYTES)
    }

    pub(crate) fn with_index(index: Index, schema: IndexSchema, writer_heap_bytes: usize) -> Result<Self> {
        let writer = index.writer(writer_heap_bytes)?;
        Ok(Self {
            index,
            schema,
            writer: Arc::new(Mutex::new(writer)),
        })
    }

    /// Locks the shared writer for the duration of `f`.
    pub fn with_writer<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut IndexWriter) -> Result<T>,
    {
        let mut writer = self.lock_writer();
        f(&mut writer)
    }

    fn lock_writer(&self) -> MutexGuard<'_, IndexWriter> {
        match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("IndexManager: writer mutex poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    /// A reader on the latest commit.
    pub fn reader(&self) -> Result<IndexReader> {
        Ok(self.index.reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?)
    }

    pub fn num_docs(&self) -> Result<u64> {
        Ok(self.reader()?.searcher().num_docs())
    }

    pub fn schema(&self) -> &IndexSchema {
        &self.schema
    }
}
