use std::sync::Arc;

use tracing::{error, info, warn};

use ticketbridge_core::conversion::{ConversionRequest, ConversionResult, FailureKind};
use ticketbridge_core::issue::NewIssue;
use ticketbridge_core::link::NewIssueLink;
use ticketbridge_core::message::MessageId;
use ticketbridge_db::{LinkStore, PutOutcome};
use ticketbridge_providers::{ChatClient, ChatError, IssueTracker};

use crate::content;

/// Turns a chat message into a tracked issue and records the link.
///
/// Stateless apart from its collaborators; share it freely across tasks.
#[derive(Clone)]
pub struct ConversionWorkflow {
    chat: Arc<dyn ChatClient>,
    tracker: Arc<dyn IssueTracker>,
    store: Arc<dyn LinkStore>,
}

impl ConversionWorkflow {
    pub fn new(
        chat: Arc<dyn ChatClient>,
        tracker: Arc<dyn IssueTracker>,
        store: Arc<dyn LinkStore>,
    ) -> Self {
        Self {
            chat,
            tracker,
            store,
        }
    }

    /// Run one conversion end to end. Every failure is reported in the
    /// returned result; nothing is retried and nothing is rolled back.
    pub async fn convert(&self, request: &ConversionRequest) -> ConversionResult {
        if request.title.trim().is_empty() {
            warn!("conversion rejected: empty title");
            return ConversionResult::failure(FailureKind::InvalidRequest, "title must not be empty");
        }
        let channel_id = request.channel_id.trim();
        if channel_id.is_empty() {
            warn!("conversion rejected: empty channel id");
            return ConversionResult::failure(
                FailureKind::InvalidRequest,
                "channel id must not be empty",
            );
        }

        let message_id = match MessageId::parse(&request.message_id) {
            Ok(id) => id,
            Err(e) => {
                warn!("conversion rejected: {e}");
                return ConversionResult::failure(FailureKind::InvalidMessageId, e.to_string());
            }
        };

        let message = match self.chat.fetch_message(channel_id, message_id).await {
            Ok(m) => m,
            Err(ChatError::NotFound(detail)) => {
                warn!("message {message_id} not found via {}", self.chat.name());
                return ConversionResult::failure(FailureKind::MessageNotFound, detail);
            }
            Err(e) => {
                error!("fetching message {message_id} failed: {e}");
                return ConversionResult::failure(FailureKind::ChatUnavailable, e.to_string());
            }
        };

        let link_key = message_id.to_string();
        match self.store.get_link(&link_key).await {
            Ok(Some(existing)) => {
                warn!(
                    "message {message_id} already linked to issue #{}",
                    existing.issue_number
                );
                return ConversionResult::failure(
                    FailureKind::AlreadyLinked,
                    format!(
                        "message {message_id} is already linked to issue #{}: {}",
                        existing.issue_number, existing.issue_url
                    ),
                );
            }
            Ok(None) => {}
            Err(e) => {
                error!("link lookup for message {message_id} failed: {e}");
                return ConversionResult::failure(FailureKind::StoreUnavailable, e.to_string());
            }
        }

        let issue = NewIssue {
            title: request.title.clone(),
            body: content::render_body(&message),
            labels: content::parse_labels(request.labels.as_deref()),
            assignees: content::parse_assignees(request.assignees.as_deref()),
        };

        let created = match self.tracker.create_issue(&issue).await {
            Ok(c) => c,
            Err(e) => {
                error!(
                    "{} rejected issue for message {message_id}: {e}",
                    self.tracker.name()
                );
                return ConversionResult::failure(FailureKind::TrackerError, e.to_string());
            }
        };

        let link = NewIssueLink {
            source_message_id: link_key,
            issue_url: created.url.clone(),
            issue_number: created.number,
        };
        match self.store.put_link(&link).await {
            Ok(PutOutcome::Inserted(_)) => {}
            Ok(PutOutcome::Duplicate { .. }) => {
                error!(
                    "issue #{} created but message {message_id} was linked concurrently; {} is orphaned",
                    created.number, created.url
                );
                return ConversionResult::failure(
                    FailureKind::PersistenceConflict,
                    format!(
                        "message {message_id} was linked by another request; issue #{} ({}) was created but not recorded",
                        created.number, created.url
                    ),
                );
            }
            Err(e) => {
                error!(
                    "issue #{} created but link for message {message_id} not stored: {e}",
                    created.number
                );
                return ConversionResult::failure(
                    FailureKind::StoreUnavailable,
                    format!(
                        "{e}; issue #{} ({}) was created but not recorded",
                        created.number, created.url
                    ),
                );
            }
        }

        info!(
            "converted message {message_id} into issue #{} ({})",
            created.number, created.url
        );
        ConversionResult::Success {
            issue_url: created.url,
            issue_number: created.number,
        }
    }
}
