use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One message of a help session as returned by `/api/messages`.
///
/// Any extra fields the server includes are ignored. Missing, null or
/// non-string `sender`/`content` never fail the row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChatMessage {
    #[serde(default, alias = "sender_name", deserialize_with = "lenient_text")]
    pub sender: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub content: String,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub timestamp: Option<String>,
}

impl ChatMessage {
    /// Decodes one array element. Rows that are not objects become empty messages.
    pub fn from_row(row: Value) -> Self {
        match serde_json::from_value(row) {
            Ok(message) => message,
            Err(err) => {
                log::debug!("Unreadable message row ({err}); rendering it empty");
                Self::default()
            }
        }
    }
}

fn text_of(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(text_of(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_optional_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(text_of(Value::deserialize(deserializer)?))
}

/// Identifies the conversation this window is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationContext {
    pub help_id: i64,
    pub me: String,
    pub peer: String,
}

impl ConversationContext {
    pub fn is_outgoing(&self, message: &ChatMessage) -> bool {
        message.sender == self.me
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_server_rows_with_extra_fields() {
        let raw = r#"[
            {"id": 1, "help_id": 7, "sender": "alice", "content": "hi", "timestamp": "2024-05-01T10:00:00"},
            {"sender_name": "bob", "receiver_name": "alice", "content": "hello"}
        ]"#;
        let messages: Vec<ChatMessage> = serde_json::from_str(raw).unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender, "alice");
        assert_eq!(messages[0].timestamp.as_deref(), Some("2024-05-01T10:00:00"));
        assert_eq!(messages[1].sender, "bob");
        assert_eq!(messages[1].timestamp, None);
    }

    #[test]
    fn outgoing_is_decided_by_sender() {
        let context = ConversationContext {
            help_id: 1,
            me: "alice".to_string(),
            peer: "bob".to_string(),
        };
        let mine = ChatMessage {
            sender: "alice".to_string(),
            content: "hi".to_string(),
            timestamp: None,
        };
        let theirs = ChatMessage {
            sender: "bob".to_string(),
            ..mine.clone()
        };

        assert!(context.is_outgoing(&mine));
        assert!(!context.is_outgoing(&theirs));
    }

    #[test]
    fn odd_rows_still_decode() {
        let rows: Vec<Value> = serde_json::from_str(
            r#"[
                {"sender": "b", "content": null},
                {"sender": 42, "timestamp": 1714557600},
                "not an object"
            ]"#,
        )
        .unwrap();
        let messages: Vec<ChatMessage> = rows.into_iter().map(ChatMessage::from_row).collect();

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].sender, "b");
        assert_eq!(messages[0].content, "");
        assert_eq!(messages[1].sender, "42");
        assert_eq!(messages[1].content, "");
        assert_eq!(messages[1].timestamp.as_deref(), Some("1714557600"));
        assert_eq!(messages[2], ChatMessage::default());
    }
}
