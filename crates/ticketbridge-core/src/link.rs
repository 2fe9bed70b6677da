use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted association between one chat message and the issue created from it.
///
/// Links are append-only: once written, `issue_url` and `issue_number` never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueLink {
    pub source_message_id: String,
    pub issue_url: String,
    pub issue_number: i64,
    pub created_at: DateTime<Utc>,
}

/// Input for a new link. `created_at` is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIssueLink {
    pub source_message_id: String,
    pub issue_url: String,
    pub issue_number: i64,
}

impl NewIssueLink {
    /// True when `link` carries exactly the data this input would persist.
    pub fn matches(&self, link: &IssueLink) -> bool {
        self.source_message_id == link.source_message_id
            && self.issue_url == link.issue_url
            && self.issue_number == link.issue_number
    }
}
