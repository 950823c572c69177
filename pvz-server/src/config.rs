//! Server configuration
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `ENVIRONMENT` | `development` | development / staging / production |
//! | `STORAGE` | `postgres` | `postgres` or `memory` |
//! | `DATABASE_URL` | required for postgres | PostgreSQL connection URL |
//! | `HTTP_PORT` | 8080 | listen port |
//! | `JWT_SECRET` | random in development | HS256 secret, at least 32 chars outside development |
//! | `JWT_EXPIRATION_HOURS` | 24 | token lifetime |
//! | `LOG_LEVEL` | info | filter used when `RUST_LOG` is unset |
//! | `LOG_FORMAT` | pretty (dev) / json | log output format |
//! | `LOG_DIR` | unset | daily rolling log files when set |
//! | `REQUEST_TIMEOUT_MS` | 10000 | per-request deadline |
//! | `DB_MAX_CONNECTIONS` | 10 | pool size |
//! | `DB_ACQUIRE_TIMEOUT_MS` | 5000 | pool acquire timeout |
//! | `DB_STATEMENT_TIMEOUT_MS` | 5000 | PostgreSQL `statement_timeout` |
//! | `METRICS_ENABLED` | true | expose `/metrics` |

use std::str::FromStr;
use std::time::Duration;

use rand::Rng;
use rand::distributions::Alphanumeric;

use crate::BoxError;

const MIN_JWT_SECRET_LEN: usize = 32;

/// Which [`PvzStore`](crate::db::PvzStore) backs the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Postgres,
    Memory,
}

impl FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "postgres" => Ok(StorageKind::Postgres),
            "memory" => Ok(StorageKind::Memory),
            other => Err(format!("STORAGE must be postgres or memory, got {other:?}")),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    /// Storage backend
    pub storage: StorageKind,
    /// PostgreSQL connection URL (empty for the memory backend)
    pub database_url: String,
    /// HTTP listen port
    pub http_port: u16,
    /// JWT signing secret
    pub jwt_secret: String,
    /// Token lifetime in hours
    pub jwt_expiration_hours: i64,
    /// Tracing filter used when `RUST_LOG` is unset
    pub log_level: String,
    pub log_format: LogFormat,
    /// Directory for rolling log files
    pub log_dir: Option<String>,
    /// Per-request deadline
    pub request_timeout: Duration,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    /// Applied to every pooled connection as `statement_timeout`
    pub db_statement_timeout: Duration,
    pub metrics_enabled: bool,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                // Random per process: development tokens do not survive a restart.
                let random: String = rand::thread_rng()
                    .sample_iter(&Alphanumeric)
                    .take(MIN_JWT_SECRET_LEN)
                    .map(char::from)
                    .collect();
                format!("dev-{random}")
            }
        };
        if environment != "development" && val.len() < MIN_JWT_SECRET_LEN {
            return Err(format!(
                "{name} must be at least {MIN_JWT_SECRET_LEN} characters in {environment} environment"
            )
            .into());
        }
        Ok(val)
    }

    fn env_or<T: FromStr>(name: &str, default: T) -> T {
        std::env::var(name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let storage = match std::env::var("STORAGE") {
            Ok(v) => v.parse::<StorageKind>()?,
            Err(_) => StorageKind::Postgres,
        };
        let database_url = match storage {
            StorageKind::Postgres => {
                std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?
            }
            StorageKind::Memory => String::new(),
        };

        let log_format = match std::env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("pretty") => LogFormat::Pretty,
            _ if environment == "development" => LogFormat::Pretty,
            _ => LogFormat::Json,
        };

        Ok(Self {
            storage,
            database_url,
            http_port: Self::env_or("HTTP_PORT", 8080),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            jwt_expiration_hours: Self::env_or("JWT_EXPIRATION_HOURS", 24),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_format,
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            request_timeout: Duration::from_millis(Self::env_or("REQUEST_TIMEOUT_MS", 10_000)),
            db_max_connections: Self::env_or("DB_MAX_CONNECTIONS", 10),
            db_acquire_timeout: Duration::from_millis(Self::env_or("DB_ACQUIRE_TIMEOUT_MS", 5_000)),
            db_statement_timeout: Duration::from_millis(Self::env_or(
                "DB_STATEMENT_TIMEOUT_MS",
                5_000,
            )),
            metrics_enabled: Self::env_or("METRICS_ENABLED", true),
            environment,
        })
    }

    /// In-memory configuration for tests and local experiments
    pub fn for_memory(jwt_secret: impl Into<String>) -> Self {
        Self {
            environment: "development".into(),
            storage: StorageKind::Memory,
            database_url: String::new(),
            http_port: 0,
            jwt_secret: jwt_secret.into(),
            jwt_expiration_hours: 24,
            log_level: "info".into(),
            log_format: LogFormat::Pretty,
            log_dir: None,
            request_timeout: Duration::from_secs(10),
            db_max_connections: 1,
            db_acquire_timeout: Duration::from_secs(5),
            db_statement_timeout: Duration::from_secs(5),
            metrics_enabled: false,
        }
    }
}
