pub mod discord;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

use ticketbridge_core::message::{ChatMessage, MessageId};

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("message not found: {0}")]
    NotFound(String),

    #[error("chat platform unavailable: {0}")]
    Unavailable(String),
}

/// Read access to the chat platform.
#[async_trait]
pub trait ChatClient: Send + Sync {
    fn name(&self) -> &str;

    /// Resolve a message inside the channel it was posted in.
    async fn fetch_message(
        &self,
        channel_id: &str,
        message_id: MessageId,
    ) -> Result<ChatMessage, ChatError>;
}
