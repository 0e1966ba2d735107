//! Message types for agent conversations.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: Vec<ContentPart>,
}

impl Message {
    fn with_text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            content: vec![ContentPart::Text { text: text.into() }],
        }
    }

    /// Create a system message.
    pub fn system(text: impl Into<String>) -> Self {
        Self::with_text(Role::System, text)
    }

    /// Create a human message.
    pub fn human(text: impl Into<String>) -> Self {
        Self::with_text(Role::Human, text)
    }

    /// Create an AI message.
    pub fn ai(text: impl Into<String>) -> Self {
        Self::with_text(Role::Ai, text)
    }

    /// Create an AI message that requests tool calls.
    ///
    /// Empty text is omitted so the message carries only the calls.
    pub fn ai_with_tool_calls(text: impl Into<String>, calls: Vec<ToolCall>) -> Self {
        let text = text.into();
        let mut content = Vec::with_capacity(calls.len() + 1);
        if !text.is_empty() {
            content.push(ContentPart::Text { text });
        }
        content.extend(calls.into_iter().map(ContentPart::ToolCall));
        Self {
            role: Role::Ai,
            content,
        }
    }

    /// Create a tool result message.
    pub fn tool_result(result: ToolResult) -> Self {
        Self {
            role: Role::other("tool"),
            content: vec![ContentPart::ToolResult(result)],
        }
    }

    /// Concatenated text parts, or `None` when the message has no text part.
    pub fn text(&self) -> Option<String> {
        let mut parts = self
            .content
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .peekable();
        parts.peek()?;
        Some(parts.collect())
    }

    /// Plain-text content as persisted.
    ///
    /// Text parts are joined. A tool result contributes its payload, verbatim
    /// when it is a string and as compact JSON otherwise. Tool calls
    /// contribute nothing, so a call-only AI message reads as `""`.
    pub fn content_text(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text { text } => Some(Cow::Borrowed(text.as_str())),
                ContentPart::ToolResult(result) => Some(match &result.result {
                    Value::String(payload) => Cow::Borrowed(payload.as_str()),
                    other => Cow::Owned(other.to_string()),
                }),
                ContentPart::ToolCall(_) => None,
            })
            .collect()
    }

    /// Tool calls requested by this message.
    pub fn tool_calls(&self) -> Vec<&ToolCall> {
        self.content
            .iter()
            .filter_map(|part| match part {
                ContentPart::ToolCall(call) => Some(call),
                _ => None,
            })
            .collect()
    }

    pub fn has_tool_calls(&self) -> bool {
        self.content
            .iter()
            .any(|part| matches!(part, ContentPart::ToolCall(_)))
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = serde_json::to_string(&self.content).map_err(|_| fmt::Error)?;
        f.write_str(&parts)
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Self::human(text)
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Self::human(text)
    }
}

/// Conversation role.
///
/// `Other` holds the name of any message kind outside the three core roles,
/// such as `"tool"`. Names built through [`Role::other`] are lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    System,
    Human,
    Ai,
    Other(String),
}

impl Role {
    /// Build a role from a kind name, folding known names onto their variants.
    pub fn other(name: impl AsRef<str>) -> Self {
        Self::parse(&name.as_ref().to_lowercase())
    }

    /// Parse a stored role name.
    ///
    /// Matching is exact. Any other name, including a differently cased core
    /// name such as `"System"`, is kept as spelled in `Other`.
    pub fn parse(name: &str) -> Self {
        match name {
            "system" => Self::System,
            "human" => Self::Human,
            "ai" => Self::Ai,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::System => "system",
            Self::Human => "human",
            Self::Ai => "ai",
            Self::Other(name) => name,
        }
    }

    /// Whether this is one of `system`, `human`, `ai`.
    pub fn is_core(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::parse(&name))
    }
}

/// A single part of message content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ToolCall(ToolCall),
    ToolResult(ToolResult),
}

/// A tool call requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

/// A tool execution result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolResult {
    pub tool_call_id: String,
    pub result: serde_json::Value,
    #[serde(default)]
    pub is_error: bool,
}
