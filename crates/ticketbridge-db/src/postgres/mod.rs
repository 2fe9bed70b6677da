pub(crate) mod migrations;
pub mod queries;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::warn;

use ticketbridge_core::link::{IssueLink, NewIssueLink};

use crate::{DbError, LinkStore, PutOutcome};

/// Map a sqlx::Error into a DbError::Unavailable.
pub(crate) fn pg_err(e: sqlx::Error) -> DbError {
    DbError::Unavailable(e.to_string())
}

#[derive(Clone)]
pub struct PostgresLinkStore {
    pub(crate) pool: PgPool,
}

impl PostgresLinkStore {
    /// Connect to a Postgres database and run migrations.
    pub async fn connect(url: &str) -> Result<Self, DbError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
            .map_err(pg_err)?;

        let store = Self { pool };
        store.initialize().await?;
        Ok(store)
    }
}

#[async_trait]
impl LinkStore for PostgresLinkStore {
    async fn initialize(&self) -> Result<(), DbError> {
        migrations::run(&self.pool).await
    }

    async fn put_link(&self, input: &NewIssueLink) -> Result<PutOutcome, DbError> {
        self.pg_put_link(input).await
    }

    async fn get_link(&self, source_message_id: &str) -> Result<Option<IssueLink>, DbError> {
        self.pg_get_link(source_message_id).await
    }

    async fn ping(&self) -> bool {
        match sqlx::query("SELECT 1").execute(&self.pool).await {
            Ok(_) => true,
            Err(e) => {
                warn!("postgres ping failed: {e}");
                false
            }
        }
    }
}
