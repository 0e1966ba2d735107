//! Convenience re-exports for common use.

pub use crate::config::{MemoryConfig, Phase};
pub use crate::error::{MemoryError, Result};
pub use crate::memory::{
    record_turn, ChatModel, ConversationStore, FileConversationStore, LoadOutcome, Transcript,
    ToolExecutor,
};
pub use crate::tools::ShellCommandTool;
pub use crate::types::{ContentPart, Message, Role, ToolCall, ToolResult};
