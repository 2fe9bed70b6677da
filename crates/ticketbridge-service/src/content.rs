//! Issue content synthesis: body, labels and assignees derived from a
//! chat message and the invoker's request. Pure and deterministic.

use std::fmt::Write;

use ticketbridge_core::message::ChatMessage;

/// Label attached to every issue opened from a chat message.
pub const BASE_LABEL: &str = "user-reported";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";
const DIRECT_MESSAGE: &str = "Direct message";
const NO_TEXT_CONTENT: &str = "*No text content*";

/// Render the issue body for `message`.
///
/// The output depends only on the message; it contains no wall-clock time.
pub fn render_body(message: &ChatMessage) -> String {
    let server = message
        .origin
        .server_name
        .as_deref()
        .unwrap_or(DIRECT_MESSAGE);
    let channel = message
        .origin
        .channel_name
        .as_deref()
        .unwrap_or(DIRECT_MESSAGE);
    let content = if message.content.is_empty() {
        NO_TEXT_CONTENT
    } else {
        message.content.as_str()
    };

    let mut body = format!(
        "**Reported by:** {} ({})\n\
         **Server:** {server}\n\
         **Channel:** {channel}\n\
         **Link to message:** {}\n\
         **Message created:** {}\n\
         \n\
         **Original message content:**\n\
         {content}",
        message.author.mention,
        message.author.display_name,
        message.permalink,
        message.created_at.format(TIMESTAMP_FORMAT),
    );

    if !message.attachments.is_empty() {
        let _ = write!(body, "\n\n**Attachments ({}):**\n", message.attachments.len());
        for attachment in &message.attachments {
            let _ = writeln!(body, "- [{}]({})", attachment.filename, attachment.url);
        }
    }

    body
}

/// Split a comma-separated field, trimming entries and dropping empty ones.
/// Order is preserved and duplicates are kept.
pub fn split_list(field: Option<&str>) -> Vec<String> {
    field
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// The base label followed by the user-supplied labels.
pub fn parse_labels(field: Option<&str>) -> Vec<String> {
    let mut labels = vec![BASE_LABEL.to_string()];
    labels.extend(split_list(field));
    labels
}

pub fn parse_assignees(field: Option<&str>) -> Vec<String> {
    split_list(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Utc};
    use ticketbridge_core::message::{
        MessageAttachment, MessageAuthor, MessageId, MessageOrigin,
    };

    fn message() -> ChatMessage {
        ChatMessage {
            id: MessageId::new(42),
            channel_id: "7".into(),
            content: "The app crashes on load".into(),
            author: MessageAuthor {
                display_name: "Test User".into(),
                mention: "<@555>".into(),
            },
            permalink: "https://discord.com/channels/900/7/42".into(),
            created_at: Utc.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap(),
            origin: MessageOrigin {
                server_name: Some("Test Guild".into()),
                channel_name: Some("bugs".into()),
            },
            attachments: vec![],
        }
    }

    #[test]
    fn body_lists_message_context() {
        let body = render_body(&message());
        assert_eq!(
            body,
            "**Reported by:** <@555> (Test User)\n\
             **Server:** Test Guild\n\
             **Channel:** bugs\n\
             **Link to message:** https://discord.com/channels/900/7/42\n\
             **Message created:** 2023-01-01 12:00:00 UTC\n\
             \n\
             **Original message content:**\n\
             The app crashes on load"
        );
    }

    #[test]
    fn body_is_deterministic() {
        let msg = message();
        assert_eq!(render_body(&msg), render_body(&msg.clone()));
    }

    #[test]
    fn empty_content_gets_marker() {
        let mut msg = message();
        msg.content = String::new();
        assert!(render_body(&msg).ends_with("**Original message content:**\n*No text content*"));
    }

    #[test]
    fn whitespace_content_is_kept() {
        let mut msg = message();
        msg.content = "   ".into();
        let body = render_body(&msg);
        assert!(body.ends_with("**Original message content:**\n   "), "{body:?}");
        assert!(!body.contains("*No text content*"));
    }

    #[test]
    fn direct_message_origin() {
        let mut msg = message();
        msg.origin = MessageOrigin::default();
        let body = render_body(&msg);
        assert!(body.contains("**Server:** Direct message\n"));
        assert!(body.contains("**Channel:** Direct message\n"));
    }

    #[test]
    fn attachments_follow_count_header_in_order() {
        let mut msg = message();
        msg.attachments = vec![
            MessageAttachment {
                filename: "a.png".into(),
                url: "https://cdn.example/a.png".into(),
            },
            MessageAttachment {
                filename: "b.png".into(),
                url: "https://cdn.example/b.png".into(),
            },
        ];
        let body = render_body(&msg);
        assert!(body.ends_with(
            "The app crashes on load\n\n\
             **Attachments (2):**\n\
             - [a.png](https://cdn.example/a.png)\n\
             - [b.png](https://cdn.example/b.png)\n"
        ));
    }

    #[test]
    fn labels_start_with_base_and_drop_empties() {
        assert_eq!(
            parse_labels(Some("bug, ,feature")),
            ["user-reported", "bug", "feature"]
        );
        assert_eq!(parse_labels(None), ["user-reported"]);
        assert_eq!(parse_labels(Some("")), ["user-reported"]);
    }

    #[test]
    fn labels_keep_duplicates_and_order() {
        assert_eq!(
            parse_labels(Some("ui,bug,ui")),
            ["user-reported", "ui", "bug", "ui"]
        );
    }

    #[test]
    fn assignees_default_to_empty() {
        assert!(parse_assignees(None).is_empty());
        assert!(parse_assignees(Some("")).is_empty());
        assert!(parse_assignees(Some(" , ")).is_empty());
        assert_eq!(parse_assignees(Some(" alice ,bob")), ["alice", "bob"]);
    }
}
