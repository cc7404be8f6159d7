pub mod manager;
pub mod schema;
pub mod document;
pub mod delete;
pub mod stats;
pub mod search;
pub mod tests;

pub use manager::IndexManager;
pub use schema::IndexSchema;
pub use search::DeleteQuery;
