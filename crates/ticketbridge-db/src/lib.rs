#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "postgres")]
pub use postgres::PostgresLinkStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteLinkStore;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use ticketbridge_core::link::{IssueLink, NewIssueLink};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of inserting a link.
///
/// A duplicate is an expected outcome, not an error: the unique key on
/// `source_message_id` is what stops one message from producing two issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutOutcome {
    Inserted(IssueLink),
    Duplicate { source_message_id: String },
}

impl PutOutcome {
    pub fn is_inserted(&self) -> bool {
        matches!(self, PutOutcome::Inserted(_))
    }
}

/// Durable, append-only mapping from a source message to the issue created from it.
///
/// Implementations must enforce uniqueness of `source_message_id` atomically,
/// so that concurrent `put_link` calls for the same message yield exactly one
/// `Inserted`.
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Create the backing schema if absent. Idempotent.
    async fn initialize(&self) -> Result<(), DbError>;

    async fn put_link(&self, input: &NewIssueLink) -> Result<PutOutcome, DbError>;

    async fn get_link(&self, source_message_id: &str) -> Result<Option<IssueLink>, DbError>;

    /// Cheap liveness check, independent of `get_link`/`put_link`.
    async fn ping(&self) -> bool;
}

#[derive(Debug, Clone, Default)]
pub struct DbConfig {
    /// Path of the SQLite database file. Defaults to `data_dir()/ticketbridge.db`.
    pub sqlite_path: Option<String>,
    /// Postgres connection URL. Only honoured with the `postgres` feature.
    pub database_url: Option<String>,
}

impl DbConfig {
    pub fn sqlite_file(&self) -> PathBuf {
        self.sqlite_path
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir().join("ticketbridge.db"))
    }
}

/// Open the configured backend and make sure its schema exists.
pub async fn open_store(config: &DbConfig) -> Result<Arc<dyn LinkStore>, DbError> {
    #[cfg(feature = "postgres")]
    {
        if let Some(url) = config.database_url.as_deref() {
            let store = PostgresLinkStore::connect(url).await?;
            tracing::info!("link store: postgres");
            return Ok(Arc::new(store));
        }
    }
    open_file_store(config).await
}

#[cfg(feature = "sqlite")]
async fn open_file_store(config: &DbConfig) -> Result<Arc<dyn LinkStore>, DbError> {
    let path = config.sqlite_file();
    let shown = path.display().to_string();
    let store = tokio::task::spawn_blocking(move || SqliteLinkStore::open_path(&path))
        .await
        .map_err(|e| DbError::Unavailable(e.to_string()))??;
    tracing::info!("link store: sqlite at {shown}");
    Ok(Arc::new(store))
}

#[cfg(not(feature = "sqlite"))]
async fn open_file_store(_config: &DbConfig) -> Result<Arc<dyn LinkStore>, DbError> {
    Err(DbError::Unavailable(
        "sqlite backend not compiled in and no DATABASE_URL set".into(),
    ))
}

/// Default data directory: `$XDG_DATA_HOME/ticketbridge` or `~/.local/share/ticketbridge`.
pub fn data_dir() -> PathBuf {
    let base = if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg)
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local/share")
    } else {
        PathBuf::from(".")
    };
    base.join("ticketbridge")
}
