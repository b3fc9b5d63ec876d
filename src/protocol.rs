//! Wire protocol for the mock chat exchange.
//!
//! Defines the request body accepted by `POST /chat` and the framed
//! [`StreamEvent`] payload carried inside each SSE frame. The event shape
//! mirrors a chat-completion chunk: one choice whose `finish_reason` stays
//! `null` while content is streaming and flips to `"stop"` on the terminal
//! event.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// The single model identifier the responder accepts.
pub const MODEL_ID: &str = "ellm";

/// Completion marker carried by the terminal event of a turn.
pub const FINISH_STOP: &str = "stop";

/// Object tag present on every streamed event.
pub const OBJECT_CHAT_COMPLETION: &str = "chat.completion";

/// Paragraph delimiter inside the reply payload.
///
/// The reply text is JSON-escaped: paragraphs are separated by the literal
/// four-character `\n\n` escape sequence, not by real newlines.
pub const PARAGRAPH_DELIMITER: &str = "\\n\\n";

/// Request body for `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation messages; the responder requires exactly one.
    pub messages: Vec<ChatMessage>,
    /// Model identifier; must equal [`MODEL_ID`].
    pub model: String,
}

impl ChatRequest {
    /// Build the single-message request for one user turn.
    #[must_use]
    pub fn user_turn(content: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage {
                role: Role::User,
                content: content.into(),
            }],
            model: MODEL_ID.to_string(),
        }
    }
}

/// One message in a chat request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message author.
    pub role: Role,
    /// Message text.
    pub content: String,
}

/// Role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User message.
    User,
    /// Assistant response.
    Assistant,
}

/// One framed event of the reply stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamEvent {
    /// Model that produced the event.
    pub model: String,
    /// Conversation identifier, constant across one turn.
    pub id: String,
    /// Choices; the responder always emits exactly one.
    pub choices: Vec<Choice>,
    /// Emission time as epoch milliseconds.
    pub created: i64,
    /// Always [`OBJECT_CHAT_COMPLETION`].
    pub object: String,
}

/// A single choice inside a [`StreamEvent`].
///
/// `finish_reason` is serialized unconditionally so the wire format carries
/// an explicit `null` while content is still streaming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Index of this choice; always 0.
    pub index: usize,
    /// `None` while streaming, `Some("stop")` on the terminal event.
    pub finish_reason: Option<String>,
    /// The content fragment for this event.
    pub message: ChoiceMessage,
}

/// Delta payload of a choice: a role and a content fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceMessage {
    /// Content fragment; empty on the terminal event.
    pub content: String,
    /// Always [`Role::Assistant`].
    pub role: Role,
}

impl StreamEvent {
    /// Event carrying the next content fragment of a turn.
    #[must_use]
    pub fn content(conversation_id: &str, fragment: &str) -> Self {
        Self::chunk(conversation_id, fragment, None)
    }

    /// The terminal event: empty content, `finish_reason: "stop"`.
    #[must_use]
    pub fn terminal(conversation_id: &str) -> Self {
        Self::chunk(conversation_id, "", Some(FINISH_STOP.to_string()))
    }

    fn chunk(conversation_id: &str, fragment: &str, finish_reason: Option<String>) -> Self {
        Self {
            model: MODEL_ID.to_string(),
            id: conversation_id.to_string(),
            choices: vec![Choice {
                index: 0,
                finish_reason,
                message: ChoiceMessage {
                    content: fragment.to_string(),
                    role: Role::Assistant,
                },
            }],
            created: Utc::now().timestamp_millis(),
            object: OBJECT_CHAT_COMPLETION.to_string(),
        }
    }

    /// The content fragment of the first choice, empty if absent.
    #[must_use]
    pub fn content_fragment(&self) -> &str {
        self.choices.first().map_or("", |c| c.message.content.as_str())
    }

    /// Whether this event closes the turn.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.choices
            .first()
            .is_some_and(|c| c.finish_reason.as_deref() == Some(FINISH_STOP))
    }
}

/// Split an accumulated reply into paragraph units for display grouping.
#[must_use]
pub fn split_paragraphs(text: &str) -> Vec<String> {
    text.split(PARAGRAPH_DELIMITER).map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_event_carries_explicit_null_finish_reason() {
        let event = StreamEvent::content("abc123", "hello");
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""finish_reason":null"#));
        assert!(json.contains(r#""object":"chat.completion""#));
        assert!(json.contains(r#""role":"assistant""#));
        assert!(!event.is_terminal());
    }

    #[test]
    fn terminal_event_is_empty_and_stops() {
        let event = StreamEvent::terminal("abc123");
        assert!(event.is_terminal());
        assert!(event.content_fragment().is_empty());

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""finish_reason":"stop""#));
    }

    #[test]
    fn user_turn_request_matches_wire_shape() {
        let req = ChatRequest::user_turn("hi");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "messages": [{ "role": "user", "content": "hi" }],
                "model": "ellm",
            })
        );
    }

    #[test]
    fn paragraph_split_uses_the_literal_escape_delimiter() {
        let text = "first\\n\\nsecond\\n\\n";
        assert_eq!(split_paragraphs(text), vec!["first", "second", ""]);

        // Real newlines are not paragraph boundaries.
        assert_eq!(split_paragraphs("a\n\nb"), vec!["a\n\nb"]);
    }
}
