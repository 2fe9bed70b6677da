use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

use ticketbridge_core::link::{IssueLink, NewIssueLink};

use super::super::{SqliteLinkStore, SqliteResultExt};
use crate::{DbError, PutOutcome};

fn row_to_link(row: &Row) -> rusqlite::Result<IssueLink> {
    Ok(IssueLink {
        source_message_id: row.get("source_message_id")?,
        issue_url: row.get("issue_url")?,
        issue_number: row.get("issue_number")?,
        created_at: row.get("created_at")?,
    })
}

impl SqliteLinkStore {
    pub fn put_link_sync(&self, input: &NewIssueLink) -> Result<PutOutcome, DbError> {
        self.with_conn(|conn| {
            let inserted = conn
                .execute(
                    "INSERT INTO issue_links (source_message_id, issue_url, issue_number)
                     VALUES (?1, ?2, ?3)
                     ON CONFLICT(source_message_id) DO NOTHING",
                    params![
                        input.source_message_id,
                        input.issue_url,
                        input.issue_number,
                    ],
                )
                .to_db()?;
            if inserted == 0 {
                debug!(
                    "link for message {} already exists",
                    input.source_message_id
                );
                return Ok(PutOutcome::Duplicate {
                    source_message_id: input.source_message_id.clone(),
                });
            }
            let link = conn
                .query_row(
                    "SELECT * FROM issue_links WHERE source_message_id = ?1",
                    params![input.source_message_id],
                    row_to_link,
                )
                .to_db()?;
            Ok(PutOutcome::Inserted(link))
        })
    }

    pub fn get_link_sync(&self, source_message_id: &str) -> Result<Option<IssueLink>, DbError> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT * FROM issue_links WHERE source_message_id = ?1",
                params![source_message_id],
                row_to_link,
            )
            .optional()
            .to_db()
        })
    }
}
