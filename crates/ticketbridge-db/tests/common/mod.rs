// Backend-agnostic integration tests for the LinkStore trait.
//
// Each public async function accepts `Arc<dyn LinkStore>` so that the same
// logic can be exercised against both the SQLite and Postgres backends.

use std::sync::Arc;

use ticketbridge_core::link::NewIssueLink;
use ticketbridge_db::{LinkStore, PutOutcome};

fn make_link(message_id: &str, number: i64) -> NewIssueLink {
    NewIssueLink {
        source_message_id: message_id.to_string(),
        issue_url: format!("https://github.com/owner/repo/issues/{number}"),
        issue_number: number,
    }
}

/// `get_link` after a successful `put_link` returns the inserted link.
pub async fn test_put_then_get(db: Arc<dyn LinkStore>) {
    let input = make_link("123456789", 1);
    let inserted = match db.put_link(&input).await.unwrap() {
        PutOutcome::Inserted(link) => link,
        other => panic!("expected Inserted, got {other:?}"),
    };
    assert_eq!(inserted.source_message_id, "123456789");
    assert_eq!(inserted.issue_url, "https://github.com/owner/repo/issues/1");
    assert_eq!(inserted.issue_number, 1);

    let fetched = db.get_link("123456789").await.unwrap();
    assert_eq!(fetched, Some(inserted));
}

/// Identifiers that were never put are reported as absent, not as errors.
pub async fn test_get_missing(db: Arc<dyn LinkStore>) {
    assert!(db.get_link("999999999").await.unwrap().is_none());
    assert!(db.get_link("").await.unwrap().is_none());
}

/// A second put for the same message is rejected and the first write wins.
pub async fn test_duplicate_rejected(db: Arc<dyn LinkStore>) {
    assert!(db.put_link(&make_link("42", 1)).await.unwrap().is_inserted());

    let second = db.put_link(&make_link("42", 2)).await.unwrap();
    assert_eq!(
        second,
        PutOutcome::Duplicate {
            source_message_id: "42".into()
        }
    );

    let stored = db.get_link("42").await.unwrap().unwrap();
    assert_eq!(stored.issue_number, 1);
    assert_eq!(stored.issue_url, "https://github.com/owner/repo/issues/1");
}

/// Racing puts for one message: exactly one succeeds.
pub async fn test_concurrent_puts_single_winner(db: Arc<dyn LinkStore>) {
    let mut handles = Vec::new();
    for n in 1..=8 {
        let db = db.clone();
        handles.push(tokio::spawn(async move {
            db.put_link(&make_link("777", n)).await.unwrap()
        }));
    }

    let mut inserted = 0;
    let mut duplicates = 0;
    for handle in handles {
        match handle.await.unwrap() {
            PutOutcome::Inserted(_) => inserted += 1,
            PutOutcome::Duplicate { .. } => duplicates += 1,
        }
    }
    assert_eq!(inserted, 1);
    assert_eq!(duplicates, 7);
}

/// Links for different messages do not interfere.
pub async fn test_independent_messages(db: Arc<dyn LinkStore>) {
    for (id, number) in [("1", 10), ("2", 20), ("3", 30)] {
        assert!(db.put_link(&make_link(id, number)).await.unwrap().is_inserted());
    }
    for (id, number) in [("1", 10), ("2", 20), ("3", 30)] {
        let link = db.get_link(id).await.unwrap().unwrap();
        assert_eq!(link.issue_number, number);
    }
}

/// `initialize` may be called repeatedly and never loses data.
pub async fn test_initialize_idempotent(db: Arc<dyn LinkStore>) {
    db.put_link(&make_link("5", 5)).await.unwrap();
    db.initialize().await.unwrap();
    db.initialize().await.unwrap();
    assert!(db.get_link("5").await.unwrap().is_some());
}

pub async fn test_ping(db: Arc<dyn LinkStore>) {
    assert!(db.ping().await);
}
