use thiserror::Error;

pub type Result<T> = std::result::Result<T, PurgeError>;

#[derive(Error, Debug)]
pub enum PurgeError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("delete by query failed for query {query}, deleted {deleted} before failure: {source}")]
    DeleteByQuery {
        query: String,
        deleted: usize,
        #[source]
        source: Box<PurgeError>,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Tantivy error: {0}")]
    TantivyError(#[from] tantivy::TantivyError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl PurgeError {
    /// Documents confirmed deleted before the error, when known.
    pub fn deleted(&self) -> Option<usize> {
        match self {
            PurgeError::DeleteByQuery { deleted, .. } => Some(*deleted),
            _ => None,
        }
    }
}
