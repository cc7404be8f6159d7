use purge_service::http::{router, AppState};
use purge_service::{Config, IndexManager};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    purge_service::init_logging();
    purge_service::init_metrics();

    tracing::info!("Starting purge service");

    let config = match std::env::var("PURGE_CONFIG") {
        Ok(path) => Config::from_file(&path)?,
        Err(_) => Config::from_env().unwrap_or_else(|_| Config::default()),
    };
    tracing::info!("Loaded configuration: {:?}", config);

    let index_dir = config.index_dir();
    let index = IndexManager::open_or_create(&index_dir, config.index.writer_heap_bytes)?;
    tracing::info!("Opened index at {} with {} documents", index_dir.display(), index.num_docs()?);

    let addr = config.server.address;
    let app = router(AppState::new(index, config));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Purge service listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
