pub mod conversion;
pub mod error;
pub mod health;
pub mod issue;
pub mod link;
pub mod message;

pub use conversion::{ConversionRequest, ConversionResult, FailureKind};
pub use error::CoreError;
pub use health::HealthReport;
pub use issue::{CreatedIssue, NewIssue};
pub use link::{IssueLink, NewIssueLink};
pub use message::{ChatMessage, MessageAttachment, MessageAuthor, MessageId, MessageOrigin};
