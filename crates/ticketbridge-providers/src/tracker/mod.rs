pub mod github;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

use ticketbridge_core::issue::{CreatedIssue, NewIssue};

#[derive(Debug, Error)]
pub enum TrackerError {
    /// The tracker answered, but refused the request.
    #[error("{0}")]
    Rejected(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    InvalidResponse(String),

    #[error("{0}")]
    Other(String),
}

/// Write access to the issue tracker.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    fn name(&self) -> &str;

    async fn create_issue(&self, issue: &NewIssue) -> Result<CreatedIssue, TrackerError>;

    /// Fetch a small repository resource. Used as a liveness probe.
    async fn get_resource(&self, path: &str) -> Result<Vec<u8>, TrackerError>;
}
