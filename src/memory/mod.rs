//! Bounded, file-persisted conversation memory.

pub mod record;
pub mod store;
pub mod transcript;
pub mod turn;

pub use record::MemoryRecord;
pub use store::{ConversationStore, FileConversationStore, LoadOutcome, MemoryStats};
pub use transcript::{Transcript, DEFAULT_MAX_MESSAGES};
pub use turn::{execute_tool_calls, record_turn, ChatModel, ToolExecutor};
