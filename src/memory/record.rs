//! On-disk record shape and role mapping.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::types::{Message, Role};

/// A single persisted `{role, content}` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryRecord {
    #[serde(default = "default_role", deserialize_with = "role_or_human")]
    pub role: String,
    #[serde(default, deserialize_with = "content_or_empty")]
    pub content: String,
}

impl MemoryRecord {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Rebuild a message from this record.
    ///
    /// `system`, `human` and `ai` keep their roles. Every other role becomes
    /// a human message so models without a notion of that kind still see it.
    pub fn into_message(self) -> Message {
        match Role::parse(&self.role) {
            Role::System => Message::system(self.content),
            Role::Ai => Message::ai(self.content),
            Role::Human | Role::Other(_) => Message::human(self.content),
        }
    }
}

impl From<&Message> for MemoryRecord {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role.as_str().to_lowercase(),
            content: message.content_text(),
        }
    }
}

fn default_role() -> String {
    Role::Human.as_str().to_string()
}

fn role_or_human<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(role) => role,
        _ => default_role(),
    })
}

fn content_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(content) => content,
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(value: Value) -> MemoryRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn missing_role_defaults_to_human() {
        assert_eq!(record(json!({"content": "hi"})).role, "human");
    }

    #[test]
    fn non_string_role_defaults_to_human() {
        assert_eq!(record(json!({"role": null, "content": "hi"})).role, "human");
    }

    #[test]
    fn null_or_missing_content_is_empty() {
        assert_eq!(record(json!({"role": "ai", "content": null})).content, "");
        assert_eq!(record(json!({"role": "ai"})).content, "");
    }

    #[test]
    fn structured_content_is_kept_as_json_text() {
        let rec = record(json!({"role": "ai", "content": [{"type": "text", "text": "x"}]}));
        assert_eq!(rec.content, r#"[{"text":"x","type":"text"}]"#);
    }

    #[test]
    fn unknown_role_reloads_as_human_with_content() {
        let message = MemoryRecord::new("toolmessage", "22/tcp open ssh").into_message();
        assert_eq!(message.role, Role::Human);
        assert_eq!(message.text().as_deref(), Some("22/tcp open ssh"));
    }

    #[test]
    fn core_roles_round_trip() {
        for message in [Message::system("s"), Message::human("h"), Message::ai("a")] {
            let rebuilt = MemoryRecord::from(&message).into_message();
            assert_eq!(rebuilt, message);
        }
    }

    #[test]
    fn other_roles_save_lowercased() {
        let message = Message {
            role: Role::Other("ToolMessage".into()),
            content: vec![crate::types::ContentPart::Text {
                text: "out".into(),
            }],
        };
        assert_eq!(MemoryRecord::from(&message).role, "toolmessage");
    }
}
