use pvz_server::{AppState, BoxError, Config, logger, metrics};

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    // Keep the guard alive so file logs are flushed on exit
    let _log_guard = logger::init_logger(
        &config.log_level,
        config.log_format,
        config.log_dir.as_deref(),
    );

    tracing::info!(
        "Starting pvz-server (env: {}, storage: {:?})",
        config.environment,
        config.storage
    );

    if std::env::var("JWT_SECRET").is_err() {
        tracing::warn!("JWT_SECRET not set; using a random development secret");
    }

    let mut state = AppState::new(&config).await?;

    if config.metrics_enabled {
        match metrics::install_recorder() {
            Ok(handle) => state = state.with_metrics(handle),
            Err(e) => tracing::warn!("Metrics disabled: {e}"),
        }
    }

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("pvz-server HTTP listening on {addr}");

    pvz_server::serve(listener, state).await
}
