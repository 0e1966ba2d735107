//! One conversational turn against a persisted store.
//!
//! A turn loads memory, prompts the model with `system + memory + incoming`,
//! then writes `memory + incoming + response` back as a full replacement.
//! The system prompt is rebuilt every turn and never persisted.

use async_trait::async_trait;

use super::store::ConversationStore;
use crate::error::Result;
use crate::types::{Message, ToolCall, ToolResult};

/// A model that answers an ordered prompt with a single message.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn invoke(&self, prompt: &[Message]) -> Result<Message>;
}

/// Something that can run a model-requested tool call.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    async fn execute(&self, call: &ToolCall) -> Result<ToolResult>;
}

/// Run one turn and persist it.
///
/// Nothing is written when the model call fails.
pub async fn record_turn<S, M>(
    store: &S,
    system_prompt: &Message,
    incoming: Vec<Message>,
    model: &M,
) -> Result<Message>
where
    S: ConversationStore + ?Sized,
    M: ChatModel + ?Sized,
{
    let memory = store.load().into_messages();

    let mut prompt = Vec::with_capacity(memory.len() + incoming.len() + 1);
    prompt.push(system_prompt.clone());
    prompt.extend(memory.iter().cloned());
    prompt.extend(incoming.iter().cloned());

    let response = model.invoke(&prompt).await?;

    let mut updated = memory;
    updated.extend(incoming);
    updated.push(response.clone());
    store.save(&updated)?;

    Ok(response)
}

/// Run every tool call in `response`, in order, as tool-result messages.
///
/// A failing call becomes an error result so the model can see what went
/// wrong on its next turn.
pub async fn execute_tool_calls<E>(executor: &E, response: &Message) -> Vec<Message>
where
    E: ToolExecutor + ?Sized,
{
    let mut results = Vec::new();
    for call in response.tool_calls() {
        let result = match executor.execute(call).await {
            Ok(result) => result,
            Err(err) => {
                tracing::debug!(tool = %call.name, error = %err, "tool call failed");
                ToolResult {
                    tool_call_id: call.id.clone(),
                    result: serde_json::json!({ "error": err.to_string() }),
                    is_error: true,
                }
            }
        };
        results.push(Message::tool_result(result));
    }
    results
}
