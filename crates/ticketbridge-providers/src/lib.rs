pub mod chat;
pub mod tracker;

pub use chat::{ChatClient, ChatError};
pub use tracker::{IssueTracker, TrackerError};
