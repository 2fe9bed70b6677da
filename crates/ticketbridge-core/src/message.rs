use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Native message key of the chat platform (a 64-bit snowflake).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(u64);

impl MessageId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Parse a user-supplied identifier. Surrounding whitespace is ignored;
    /// anything other than a base-10 unsigned integer is rejected.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let trimmed = input.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::InvalidMessageId(input.to_string()));
        }
        trimmed
            .parse::<u64>()
            .map(Self)
            .map_err(|_| CoreError::InvalidMessageId(input.to_string()))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAuthor {
    pub display_name: String,
    /// Platform mention form, e.g. `<@1234>`.
    pub mention: String,
}

/// Where a message was posted. `None` names mean a direct message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageOrigin {
    pub server_name: Option<String>,
    pub channel_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAttachment {
    pub filename: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub channel_id: String,
    pub content: String,
    pub author: MessageAuthor,
    pub permalink: String,
    pub created_at: DateTime<Utc>,
    pub origin: MessageOrigin,
    pub attachments: Vec<MessageAttachment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_snowflakes() {
        assert_eq!(MessageId::parse("42").unwrap().get(), 42);
        assert_eq!(
            MessageId::parse(" 1234567890123456789 ").unwrap().get(),
            1234567890123456789
        );
    }

    #[test]
    fn parse_rejects_malformed_ids() {
        for input in ["", "   ", "not-a-number", "-5", "+5", "12a", "1.5", "99999999999999999999"] {
            assert_eq!(
                MessageId::parse(input),
                Err(CoreError::InvalidMessageId(input.to_string())),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn display_is_decimal() {
        assert_eq!(MessageId::new(987654321).to_string(), "987654321");
    }
}
