//! Shared test helpers and mock collaborators.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use tempfile::TempDir;

use pentest_memory::config::MemoryConfig;
use pentest_memory::error::{MemoryError, Result};
use pentest_memory::memory::{ChatModel, FileConversationStore, ToolExecutor};
use pentest_memory::types::*;

/// A model that returns canned responses and records every prompt.
pub struct MockModel {
    responses: Mutex<Vec<Result<Message>>>,
    prompts: Mutex<Vec<Vec<Message>>>,
}

impl MockModel {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Queue a text response.
    pub fn queue_response(&self, text: &str) {
        self.responses.lock().unwrap().push(Ok(Message::ai(text)));
    }

    pub fn queue_message(&self, message: Message) {
        self.responses.lock().unwrap().push(Ok(message));
    }

    pub fn queue_error(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push(Err(MemoryError::Model(message.to_string())));
    }

    pub fn prompts(&self) -> Vec<Vec<Message>> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for MockModel {
    async fn invoke(&self, prompt: &[Message]) -> Result<Message> {
        self.prompts.lock().unwrap().push(prompt.to_vec());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(MemoryError::Model("no queued response".into()));
        }
        responses.remove(0)
    }
}

/// Executor that echoes the call's arguments, failing for `fail`.
pub struct EchoExecutor;

#[async_trait]
impl ToolExecutor for EchoExecutor {
    async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        if call.name == "fail" {
            return Err(MemoryError::ToolExecution {
                tool_name: call.name.clone(),
                message: "boom".into(),
            });
        }
        Ok(ToolResult {
            tool_call_id: call.id.clone(),
            result: call.arguments.clone(),
            is_error: false,
        })
    }
}

pub fn temp_store(max_messages: usize) -> (TempDir, FileConversationStore) {
    let dir = TempDir::new().unwrap();
    let config = MemoryConfig::builder()
        .path(dir.path().join("enumeration_memory.json"))
        .max_messages(max_messages)
        .build();
    (dir, FileConversationStore::new(config).unwrap())
}

/// `(role, text)` pairs for comparison.
pub fn pairs(messages: &[Message]) -> Vec<(String, String)> {
    messages
        .iter()
        .map(|m| (m.role.to_string(), m.content_text()))
        .collect()
}

pub fn tool_call(id: &str, name: &str, arguments: serde_json::Value) -> ToolCall {
    ToolCall {
        id: id.to_string(),
        name: name.to_string(),
        arguments,
    }
}
