use rusqlite::Connection;

use super::SqliteResultExt;
use crate::DbError;

pub fn run(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        );",
    )
    .to_db()?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |r| r.get(0),
        )
        .to_db()?;

    if current_version < 1 {
        // v1: message -> issue links, keyed by the opaque message id
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS issue_links (
                source_message_id TEXT PRIMARY KEY,
                issue_url         TEXT NOT NULL,
                issue_number      INTEGER NOT NULL,
                created_at        TEXT NOT NULL
                                      DEFAULT (strftime('%Y-%m-%dT%H:%M:%f+00:00', 'now'))
            );",
        )
        .to_db()?;

        conn.execute(
            "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (1, datetime('now'))",
            [],
        )
        .to_db()?;
    }

    Ok(())
}
