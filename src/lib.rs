pub mod config;
pub mod error;
pub mod http;
pub mod index;
pub mod metrics;
pub mod purge;

pub use config::Config;
pub use error::{PurgeError, Result};
pub use metrics::{init_logging, init_metrics};
pub use index::{DeleteQuery, IndexManager, IndexSchema};
pub use purge::{DeleteBatch, DeleteByQuery, DEFAULT_DELETE_BATCH_SIZE};
