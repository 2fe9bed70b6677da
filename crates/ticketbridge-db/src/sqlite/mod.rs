pub(crate) mod migrations;
pub mod queries;

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::Connection;
use tracing::warn;

use ticketbridge_core::link::{IssueLink, NewIssueLink};

use crate::{DbError, LinkStore, PutOutcome};

/// Extension trait that converts `rusqlite::Result<T>` into `Result<T, DbError>`.
pub(crate) trait SqliteResultExt<T> {
    fn to_db(self) -> Result<T, DbError>;
}

impl<T> SqliteResultExt<T> for rusqlite::Result<T> {
    fn to_db(self) -> Result<T, DbError> {
        self.map_err(map_sqlite_err)
    }
}

#[derive(Clone)]
pub struct SqliteLinkStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteLinkStore {
    /// Open (creating if needed) the database file and its parent directories.
    pub fn open_path(path: &Path) -> Result<Self, DbError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path).to_db()?;
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA busy_timeout=5000;",
        )
        .to_db()?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.initialize_sync()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory().to_db()?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.initialize_sync()?;
        Ok(store)
    }

    pub(crate) fn with_conn<F, T>(&self, f: F) -> Result<T, DbError>
    where
        F: FnOnce(&Connection) -> Result<T, DbError>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|_| DbError::Unavailable("lock poisoned".into()))?;
        f(&conn)
    }

    pub fn initialize_sync(&self) -> Result<(), DbError> {
        self.with_conn(migrations::run)
    }

    pub fn ping_sync(&self) -> Result<(), DbError> {
        self.with_conn(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                .to_db()?;
            Ok(())
        })
    }
}

/// Map a `rusqlite::Error` into a `DbError::Unavailable`.
pub(crate) fn map_sqlite_err(e: rusqlite::Error) -> DbError {
    DbError::Unavailable(e.to_string())
}

#[async_trait]
impl LinkStore for SqliteLinkStore {
    async fn initialize(&self) -> Result<(), DbError> {
        let db = self.clone();
        tokio::task::spawn_blocking(move || db.initialize_sync())
            .await
            .map_err(|e| DbError::Unavailable(e.to_string()))?
    }

    async fn put_link(&self, input: &NewIssueLink) -> Result<PutOutcome, DbError> {
        let db = self.clone();
        let input = input.clone();
        tokio::task::spawn_blocking(move || db.put_link_sync(&input))
            .await
            .map_err(|e| DbError::Unavailable(e.to_string()))?
    }

    async fn get_link(&self, source_message_id: &str) -> Result<Option<IssueLink>, DbError> {
        let db = self.clone();
        let id = source_message_id.to_string();
        tokio::task::spawn_blocking(move || db.get_link_sync(&id))
            .await
            .map_err(|e| DbError::Unavailable(e.to_string()))?
    }

    async fn ping(&self) -> bool {
        let db = self.clone();
        let result = tokio::task::spawn_blocking(move || db.ping_sync())
            .await
            .map_err(|e| DbError::Unavailable(e.to_string()))
            .and_then(|r| r);
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!("sqlite ping failed: {e}");
                false
            }
        }
    }
}
