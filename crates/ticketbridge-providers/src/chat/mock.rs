use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use ticketbridge_core::message::{
    ChatMessage, MessageAuthor, MessageId, MessageOrigin,
};

use super::{ChatClient, ChatError};

/// A mock chat client for testing that serves messages from memory
/// and counts fetches.
pub struct MockChatClient {
    /// Keyed by (channel id, message id).
    messages: HashMap<(String, u64), ChatMessage>,
    fetch_counter: AtomicU64,
    unavailable: bool,
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockChatClient {
    pub fn new() -> Self {
        Self {
            messages: HashMap::new(),
            fetch_counter: AtomicU64::new(0),
            unavailable: false,
        }
    }

    pub fn with_message(mut self, message: ChatMessage) -> Self {
        self.messages
            .insert((message.channel_id.clone(), message.id.get()), message);
        self
    }

    pub fn with_unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    pub fn fetch_calls(&self) -> u64 {
        self.fetch_counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_message(
        &self,
        channel_id: &str,
        message_id: MessageId,
    ) -> Result<ChatMessage, ChatError> {
        self.fetch_counter.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(ChatError::Unavailable("mock chat outage".into()));
        }
        self.messages
            .get(&(channel_id.to_string(), message_id.get()))
            .cloned()
            .ok_or_else(|| {
                ChatError::NotFound(format!("message {message_id} in channel {channel_id}"))
            })
    }
}

/// A plain guild message with fixed author and timestamp, for tests.
pub fn sample_message(id: u64, channel_id: &str) -> ChatMessage {
    ChatMessage {
        id: MessageId::new(id),
        channel_id: channel_id.to_string(),
        content: "The app crashes on load".into(),
        author: MessageAuthor {
            display_name: "Test User".into(),
            mention: "<@555>".into(),
        },
        permalink: format!("https://discord.com/channels/900/{channel_id}/{id}"),
        created_at: Utc
            .with_ymd_and_hms(2023, 1, 1, 12, 0, 0)
            .single()
            .unwrap_or_default(),
        origin: MessageOrigin {
            server_name: Some("Test Guild".into()),
            channel_name: Some("bugs".into()),
        },
        attachments: Vec::new(),
    }
}
