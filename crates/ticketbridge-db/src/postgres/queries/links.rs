use chrono::{DateTime, Utc};

use ticketbridge_core::link::{IssueLink, NewIssueLink};

use super::super::{pg_err, PostgresLinkStore};
use crate::{DbError, PutOutcome};

#[derive(sqlx::FromRow)]
struct IssueLinkRow {
    source_message_id: String,
    issue_url: String,
    issue_number: i64,
    created_at: DateTime<Utc>,
}

impl From<IssueLinkRow> for IssueLink {
    fn from(r: IssueLinkRow) -> Self {
        IssueLink {
            source_message_id: r.source_message_id,
            issue_url: r.issue_url,
            issue_number: r.issue_number,
            created_at: r.created_at,
        }
    }
}

impl PostgresLinkStore {
    pub(crate) async fn pg_put_link(&self, input: &NewIssueLink) -> Result<PutOutcome, DbError> {
        let row = sqlx::query_as::<_, IssueLinkRow>(
            "INSERT INTO issue_links (source_message_id, issue_url, issue_number)
             VALUES ($1, $2, $3)
             ON CONFLICT (source_message_id) DO NOTHING
             RETURNING *",
        )
        .bind(&input.source_message_id)
        .bind(&input.issue_url)
        .bind(input.issue_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(pg_err)?;

        Ok(match row {
            Some(row) => PutOutcome::Inserted(row.into()),
            None => PutOutcome::Duplicate {
                source_message_id: input.source_message_id.clone(),
            },
        })
    }

    pub(crate) async fn pg_get_link(
        &self,
        source_message_id: &str,
    ) -> Result<Option<IssueLink>, DbError> {
        let row = sqlx::query_as::<_, IssueLinkRow>(
            "SELECT * FROM issue_links WHERE source_message_id = $1",
        )
        .bind(source_message_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(pg_err)?;

        Ok(row.map(Into::into))
    }
}
