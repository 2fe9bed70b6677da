use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use ticketbridge_core::issue::{CreatedIssue, NewIssue};

use super::{IssueTracker, TrackerError};

/// A mock tracker for testing that records created issues
/// and returns configurable results.
pub struct MockTracker {
    issue_counter: AtomicU64,
    create_calls: AtomicU64,
    created: Mutex<Vec<NewIssue>>,
    create_fail: Option<String>,
    probe_fail: bool,
}

impl Default for MockTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTracker {
    pub fn new() -> Self {
        Self {
            issue_counter: AtomicU64::new(1),
            create_calls: AtomicU64::new(0),
            created: Mutex::new(Vec::new()),
            create_fail: None,
            probe_fail: false,
        }
    }

    /// Fail every `create_issue` with the given message.
    pub fn with_create_fail(mut self, message: &str) -> Self {
        self.create_fail = Some(message.to_string());
        self
    }

    pub fn with_probe_fail(mut self) -> Self {
        self.probe_fail = true;
        self
    }

    /// Number of `create_issue` calls, including failed ones.
    pub fn create_calls(&self) -> u64 {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Issues that were successfully created, in order.
    pub fn created_issues(&self) -> Vec<NewIssue> {
        self.created
            .lock()
            .map(|issues| issues.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl IssueTracker for MockTracker {
    fn name(&self) -> &str {
        "mock"
    }

    async fn create_issue(&self, issue: &NewIssue) -> Result<CreatedIssue, TrackerError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(msg) = &self.create_fail {
            return Err(TrackerError::Rejected(msg.clone()));
        }
        let number = self.issue_counter.fetch_add(1, Ordering::SeqCst) as i64;
        if let Ok(mut created) = self.created.lock() {
            created.push(issue.clone());
        }
        Ok(CreatedIssue {
            number,
            url: format!("https://github.com/test/repo/issues/{number}"),
        })
    }

    async fn get_resource(&self, path: &str) -> Result<Vec<u8>, TrackerError> {
        if self.probe_fail {
            return Err(TrackerError::Transport(format!("mock probe failure for {path}")));
        }
        Ok(b"# mock".to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue() -> NewIssue {
        NewIssue {
            title: "t".into(),
            body: "b".into(),
            labels: vec![],
            assignees: vec![],
        }
    }

    #[tokio::test]
    async fn numbers_issues_sequentially() {
        let tracker = MockTracker::new();
        let first = tracker.create_issue(&issue()).await.unwrap();
        let second = tracker.create_issue(&issue()).await.unwrap();
        assert_eq!(first.number, 1);
        assert_eq!(second.number, 2);
        assert_eq!(second.url, "https://github.com/test/repo/issues/2");
        assert_eq!(tracker.created_issues().len(), 2);
    }

    #[tokio::test]
    async fn create_fail_counts_call_but_records_nothing() {
        let tracker = MockTracker::new().with_create_fail("422 Validation Failed");
        let err = tracker.create_issue(&issue()).await.unwrap_err();
        assert_eq!(err.to_string(), "422 Validation Failed");
        assert_eq!(tracker.create_calls(), 1);
        assert!(tracker.created_issues().is_empty());
    }
}
