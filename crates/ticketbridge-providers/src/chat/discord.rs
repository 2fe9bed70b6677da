use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use ticketbridge_core::message::{
    ChatMessage, MessageAttachment, MessageAuthor, MessageId, MessageOrigin,
};

use super::{ChatClient, ChatError};

pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";
const PERMALINK_BASE: &str = "https://discord.com/channels";

pub struct DiscordChatClient {
    /// REST API base, e.g. "https://discord.com/api/v10".
    api_base: String,
    /// Bot token, sent as `Authorization: Bot <token>`.
    token: String,
    client: reqwest::Client,
}

impl DiscordChatClient {
    pub fn new(api_base: &str, token: String) -> Result<Self, ChatError> {
        let api_base = api_base.trim().trim_end_matches('/').to_string();
        url::Url::parse(&api_base)
            .map_err(|e| ChatError::Unavailable(format!("invalid discord api base: {e}")))?;
        if token.trim().is_empty() {
            return Err(ChatError::Unavailable("discord bot token is empty".into()));
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!(
                "DiscordBot (https://github.com/ticketbridge, ",
                env!("CARGO_PKG_VERSION"),
                ")"
            ))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ChatError::Unavailable(format!("HTTP client init: {e}")))?;

        Ok(Self {
            api_base,
            token,
            client,
        })
    }

    async fn api_get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ChatError> {
        let resp = self
            .client
            .get(format!("{}{path}", self.api_base))
            .header("Authorization", format!("Bot {}", self.token))
            .send()
            .await
            .map_err(|e| ChatError::Unavailable(format!("HTTP request failed: {e}")))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ChatError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(ChatError::Unavailable(format!(
                "GET {path} failed (status {status}): {text}"
            )));
        }

        resp.json()
            .await
            .map_err(|e| ChatError::Unavailable(format!("parse {path} response: {e}")))
    }

    /// Resolve server and channel names. Best-effort: lookups that fail
    /// leave the corresponding name unknown.
    async fn resolve_origin(&self, channel_id: &str) -> (Option<String>, MessageOrigin) {
        let channel: DiscordChannel = match self.api_get(&format!("/channels/{channel_id}")).await {
            Ok(c) => c,
            Err(e) => {
                warn!("discord: could not resolve channel {channel_id}: {e}");
                return (None, MessageOrigin::default());
            }
        };

        let server_name = match channel.guild_id.as_deref() {
            Some(guild_id) => match self.api_get::<DiscordGuild>(&format!("/guilds/{guild_id}")).await {
                Ok(guild) => Some(guild.name),
                Err(e) => {
                    warn!("discord: could not resolve guild {guild_id}: {e}");
                    None
                }
            },
            None => None,
        };

        (
            channel.guild_id,
            MessageOrigin {
                server_name,
                channel_name: channel.name,
            },
        )
    }
}

#[async_trait]
impl ChatClient for DiscordChatClient {
    fn name(&self) -> &str {
        "discord"
    }

    async fn fetch_message(
        &self,
        channel_id: &str,
        message_id: MessageId,
    ) -> Result<ChatMessage, ChatError> {
        let raw: DiscordMessage = self
            .api_get(&format!("/channels/{channel_id}/messages/{message_id}"))
            .await
            .map_err(|e| match e {
                ChatError::NotFound(_) => {
                    ChatError::NotFound(format!("message {message_id} in channel {channel_id}"))
                }
                other => other,
            })?;

        let (guild_id, origin) = self.resolve_origin(channel_id).await;
        debug!(
            "discord: fetched message {message_id} ({} attachments)",
            raw.attachments.len()
        );
        Ok(to_chat_message(raw, message_id, guild_id.as_deref(), origin))
    }
}

/// Build the jump link for a message. Direct messages use `@me` in place of a guild.
pub fn permalink(guild_id: Option<&str>, channel_id: &str, message_id: &str) -> String {
    format!(
        "{PERMALINK_BASE}/{}/{channel_id}/{message_id}",
        guild_id.unwrap_or("@me")
    )
}

fn to_chat_message(
    raw: DiscordMessage,
    message_id: MessageId,
    guild_id: Option<&str>,
    origin: MessageOrigin,
) -> ChatMessage {
    let permalink = permalink(guild_id, &raw.channel_id, &message_id.to_string());
    let display_name = raw
        .author
        .global_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| raw.author.username.clone());

    ChatMessage {
        id: message_id,
        channel_id: raw.channel_id,
        content: raw.content,
        author: MessageAuthor {
            display_name,
            mention: format!("<@{}>", raw.author.id),
        },
        permalink,
        created_at: raw.timestamp,
        origin,
        attachments: raw
            .attachments
            .into_iter()
            .map(|a| MessageAttachment {
                filename: a.filename,
                url: a.url,
            })
            .collect(),
    }
}

// Discord API response structs

#[derive(Deserialize)]
struct DiscordUser {
    id: String,
    username: String,
    #[serde(default)]
    global_name: Option<String>,
}

#[derive(Deserialize)]
struct DiscordAttachment {
    filename: String,
    url: String,
}

#[derive(Deserialize)]
struct DiscordMessage {
    channel_id: String,
    #[serde(default)]
    content: String,
    author: DiscordUser,
    timestamp: DateTime<Utc>,
    #[serde(default)]
    attachments: Vec<DiscordAttachment>,
}

#[derive(Deserialize)]
struct DiscordChannel {
    #[serde(default)]
    guild_id: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize)]
struct DiscordGuild {
    name: String,
}
