//! pvz-server: pickup point reception backend
//!
//! Pickup points receive goods in receptions. A pickup point has at most one
//! open reception; products are added to it and removed newest first until
//! it is closed. Moderators register pickup points, employees run
//! receptions, and both can browse the paginated listing.
//!
//! # Layout
//!
//! ```text
//! pvz-server/
//! ├── api/       # handlers, router, request logging
//! ├── auth/      # JWT, auth middleware, capability table
//! ├── service/   # input validation and domain rules
//! ├── db/        # PvzStore trait, PostgreSQL and in-memory stores
//! ├── config.rs  # environment configuration
//! ├── logger.rs  # tracing subscriber
//! └── metrics.rs # Prometheus recorder
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logger;
pub mod metrics;
pub mod service;
pub mod state;
pub mod util;

pub use api::build_app;
pub use config::Config;
pub use state::AppState;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Serve `state` on `listener` until SIGINT/SIGTERM
pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> Result<(), BoxError> {
    let app = build_app(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
