use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::purge::DEFAULT_DELETE_BATCH_SIZE;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub index: IndexConfig,
    #[serde(default)]
    pub purge: PurgeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub address: SocketAddr,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    pub data_dir: String,
    pub index_path: String,
    #[serde(default = "default_writer_heap_bytes")]
    pub writer_heap_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurgeConfig {
    /// Pending deletions per flush; also the largest mutation sent to the index.
    pub batch_size: usize,
}

impl Default for PurgeConfig {
    fn default() -> Self {
        PurgeConfig {
            batch_size: DEFAULT_DELETE_BATCH_SIZE,
        }
    }
}

/// Parses an environment value, warning and keeping `default` when it is malformed.
fn parse_or_default<T>(name: &str, value: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    match value.trim().parse() {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("Ignoring {}={:?} ({}), using {}", name, value, e, default);
            default
        }
    }
}

fn default_writer_heap_bytes() -> usize {
    50_000_000
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let server_address = std::env::var("SERVER_ADDRESS")
            .unwrap_or_else(|_| "0.0.0.0:8094".to_string());
        let data_dir = std::env::var("DATA_DIR")
            .unwrap_or_else(|_| "./data".to_string());
        let index_path = std::env::var("INDEX_PATH")
            .unwrap_or_else(|_| "./index".to_string());

        let mut purge_config = PurgeConfig::default();
        if let Ok(batch_size) = std::env::var("PURGE_BATCH_SIZE") {
            purge_config.batch_size =
                parse_or_default("PURGE_BATCH_SIZE", &batch_size, DEFAULT_DELETE_BATCH_SIZE);
        }

        let mut writer_heap_bytes = default_writer_heap_bytes();
        if let Ok(heap) = std::env::var("PURGE_WRITER_HEAP_BYTES") {
            writer_heap_bytes = parse_or_default("PURGE_WRITER_HEAP_BYTES", &heap, writer_heap_bytes);
        }

        Ok(Config {
            server: ServerConfig {
                address: server_address.parse()?,
            },
            index: IndexConfig {
                data_dir,
                index_path,
                writer_heap_bytes,
            },
            purge: purge_config,
        })
    }

    /// Directory holding the tantivy index files.
    pub fn index_dir(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.index.data_dir).join(&self.index.index_path)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                address: "0.0.0.0:8094".parse()
                    .expect("Failed to parse default server address"),
            },
            index: IndexConfig {
                data_dir: "./data".to_string(),
                index_path: "./index".to_string(),
                writer_heap_bytes: default_writer_heap_bytes(),
            },
            purge: PurgeConfig::default(),
        }
    }
}
