use std::fmt;

use serde::{Deserialize, Serialize};

/// A request to turn a chat message into a tracked issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRequest {
    /// Channel the command was invoked from; messages are resolved within it.
    pub channel_id: String,
    pub message_id: String,
    pub title: String,
    /// Comma-separated label names.
    #[serde(default)]
    pub labels: Option<String>,
    /// Comma-separated tracker usernames.
    #[serde(default)]
    pub assignees: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidRequest,
    InvalidMessageId,
    MessageNotFound,
    AlreadyLinked,
    ChatUnavailable,
    TrackerError,
    PersistenceConflict,
    StoreUnavailable,
}

impl FailureKind {
    pub const ALL: &[FailureKind] = &[
        FailureKind::InvalidRequest,
        FailureKind::InvalidMessageId,
        FailureKind::MessageNotFound,
        FailureKind::AlreadyLinked,
        FailureKind::ChatUnavailable,
        FailureKind::TrackerError,
        FailureKind::PersistenceConflict,
        FailureKind::StoreUnavailable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::InvalidRequest => "invalid_request",
            FailureKind::InvalidMessageId => "invalid_message_id",
            FailureKind::MessageNotFound => "message_not_found",
            FailureKind::AlreadyLinked => "already_linked",
            FailureKind::ChatUnavailable => "chat_unavailable",
            FailureKind::TrackerError => "tracker_error",
            FailureKind::PersistenceConflict => "persistence_conflict",
            FailureKind::StoreUnavailable => "store_unavailable",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == s)
    }

    /// True when the invoker supplied bad input, false when a backend failed.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            FailureKind::InvalidRequest
                | FailureKind::InvalidMessageId
                | FailureKind::MessageNotFound
                | FailureKind::AlreadyLinked
        )
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConversionResult {
    Success { issue_url: String, issue_number: i64 },
    Failure { kind: FailureKind, detail: String },
}

impl ConversionResult {
    pub fn failure(kind: FailureKind, detail: impl Into<String>) -> Self {
        ConversionResult::Failure {
            kind,
            detail: detail.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ConversionResult::Success { .. })
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            ConversionResult::Success { .. } => None,
            ConversionResult::Failure { kind, .. } => Some(*kind),
        }
    }

    /// Human-readable outcome shown to the invoker.
    pub fn summary(&self) -> String {
        match self {
            ConversionResult::Success {
                issue_url,
                issue_number,
            } => format!("Created issue #{issue_number}: {issue_url}"),
            ConversionResult::Failure { kind, detail } => match kind {
                FailureKind::InvalidRequest => format!("Invalid request: {detail}"),
                FailureKind::InvalidMessageId | FailureKind::MessageNotFound => {
                    format!("Invalid message ID or message not found: {detail}")
                }
                FailureKind::AlreadyLinked => {
                    format!("Message already converted: {detail}")
                }
                FailureKind::ChatUnavailable => format!("Could not reach chat platform: {detail}"),
                FailureKind::TrackerError => format!("Failed to create issue: {detail}"),
                FailureKind::PersistenceConflict => {
                    format!("Issue created but link conflicts with an existing one: {detail}")
                }
                FailureKind::StoreUnavailable => format!("Link store unavailable: {detail}"),
            },
        }
    }
}
