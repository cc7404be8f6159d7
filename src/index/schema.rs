use tantivy::schema::{Field, Schema, FAST, STORED, STRING, TEXT};
use tantivy::schema::TantivyDocument;
use std::collections::HashMap;

use crate::error::{PurgeError, Result};

pub const DOCUMENT_ID_FIELD: &str = "document_id";
pub const SCOPE_COLLECTION_FIELD: &str = "scope_collection";
pub const TITLE_FIELD: &str = "title";
pub const CONTENT_FIELD: &str = "content";

#[derive(Debug, Clone)]
pub struct IndexSchema {
    schema: Schema,
    pub document_id: Field,
    pub scope_collection: Field,
    pub title: Field,
    pub content: Field,
}

impl IndexSchema {
    pub fn new() -> Self {
        let mut schema_builder = Schema::builder();
        let document_id = schema_builder.add_text_field(DOCUMENT_ID_FIELD, STRING | STORED | FAST);
        let scope_collection = schema_builder.add_text_field(SCOPE_COLLECTION_FIELD, STRING | STORED);
        let title = schema_builder.add_text_field(TITLE_FIELD, TEXT | STORED);
        let content = schema_builder.add_text_field(CONTENT_FIELD, TEXT | STORED);

        IndexSchema {
            schema: schema_builder.build(),
            document_id,
            scope_collection,
            title,
            content,
        }
    }

    /// Resolves the fields of a schema loaded from an existing index.
    pub fn from_schema(schema: Schema) -> Result<Self> {
        let field = |name: &str| {
            schema
                .get_field(name)
                .map_err(|_| PurgeError::ConfigError(format!("index has no `{}` field", name)))
        };

        Ok(IndexSchema {
            document_id: field(DOCUMENT_ID_FIELD)?,
            scope_collection: field(SCOPE_COLLECTION_FIELD)?,
            title: field(TITLE_FIELD)?,
            content: field(CONTENT_FIELD)?,
            schema,
        })
    }

    pub fn schema(&self) -> Schema {
        self.schema.clone()
    }

    /// Keyword fields that accept exact term deletes.
    pub fn keyword_field(&self, name: &str) -> Option<Field> {
        match name {
            DOCUMENT_ID_FIELD => Some(self.document_id),
            SCOPE_COLLECTION_FIELD => Some(self.scope_collection),
            _ => None,
        }
    }

    pub fn to_document(&self, document_id: &str, fields: &HashMap<String, String>) -> TantivyDocument {
        let mut doc = TantivyDocument::new();
        doc.add_text(self.document_id, document_id);

        for (key, value) in fields {
            match key.as_str() {
                SCOPE_COLLECTION_FIELD => doc.add_text(self.scope_collection, value),
                TITLE_FIELD => doc.add_text(self.title, value),
                CONTENT_FIELD => doc.add_text(self.content, value),
                _ => {}
            }
        }

        doc
    }
}

impl Default for IndexSchema {
    fn default() -> Self {
        Self::new()
    }
}

/// Tag value identifying every document of a scope/collection pair.
pub fn scope_collection_tag(scope: &str, collection: &str) -> String {
    format!("_${}_${}", scope, collection)
}
