//! Application state

use std::sync::Arc;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::BoxError;
use crate::auth::{JwtConfig, JwtService};
use crate::config::{Config, StorageKind};
use crate::db::{MemoryStore, PgStore, PvzStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Storage backend
    pub store: Arc<dyn PvzStore>,
    /// Token issuer and verifier
    pub jwt: JwtService,
    /// Prometheus handle, `None` when metrics are disabled
    pub metrics: Option<PrometheusHandle>,
    /// Per-request deadline applied by the router
    pub request_timeout: Duration,
}

impl AppState {
    /// Build state around an existing store
    pub fn with_store(config: &Config, store: Arc<dyn PvzStore>) -> Self {
        Self {
            store,
            jwt: JwtService::with_config(JwtConfig {
                secret: config.jwt_secret.clone(),
                expiration_hours: config.jwt_expiration_hours,
            }),
            metrics: None,
            request_timeout: config.request_timeout,
        }
    }

    /// Create the store selected by `config` (running migrations for
    /// PostgreSQL) and wrap it in state
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let store: Arc<dyn PvzStore> = match config.storage {
            StorageKind::Postgres => Arc::new(PgStore::connect(config).await?),
            StorageKind::Memory => {
                tracing::warn!("Using in-memory storage; data is lost on restart");
                Arc::new(MemoryStore::new())
            }
        };
        Ok(Self::with_store(config, store))
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
