pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "purge_service=debug,tower_http=debug".into()),
        )
        .init();
}

pub fn init_metrics() {
    metrics::describe_counter!(
        "purge_delete_by_query_total",
        "Total number of delete-by-query calls"
    );
    metrics::describe_counter!(
        "purge_flushes_total",
        "Total number of delete batches submitted to the index"
    );
    metrics::describe_counter!(
        "purge_deleted_documents_total",
        "Total number of delete operations confirmed by the index"
    );
    metrics::describe_counter!(
        "purge_flush_errors_total",
        "Total number of delete batches rejected by the index"
    );
    metrics::describe_histogram!(
        "purge_delete_by_query_duration_seconds",
        "Delete-by-query call duration"
    );
}
