//! The `commands` tool: runs a shell command for the agent.
//!
//! Output is returned as a stdout/stderr/exit-code triple. Commands run
//! unsandboxed with the privileges of the current process.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{MemoryError, Result};
use crate::memory::ToolExecutor;
use crate::types::{ToolCall, ToolResult};

/// Name the model uses to request this tool.
pub const SHELL_TOOL_NAME: &str = "commands";

const OUTPUT_MAX_BYTES: usize = 32_768;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Captured result of one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

/// Executes commands through `sh -c`.
#[derive(Debug, Clone)]
pub struct ShellCommandTool {
    timeout: Duration,
    max_output_bytes: usize,
}

impl Default for ShellCommandTool {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_output_bytes: OUTPUT_MAX_BYTES,
        }
    }
}

impl ShellCommandTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_output_bytes(mut self, max_output_bytes: usize) -> Self {
        self.max_output_bytes = max_output_bytes;
        self
    }

    /// Run `command` and capture trimmed stdout and stderr.
    pub async fn run(&self, command: &str) -> Result<CommandOutput> {
        let result = tokio::time::timeout(
            self.timeout,
            tokio::process::Command::new("sh")
                .arg("-c")
                .arg(command)
                .kill_on_drop(true)
                .output(),
        )
        .await;

        let output = match result {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(tool_error(e.to_string())),
            Err(_) => {
                return Err(tool_error(format!(
                    "command timed out after {}s",
                    self.timeout.as_secs()
                )))
            }
        };

        Ok(CommandOutput {
            stdout: self.capture(&output.stdout),
            stderr: self.capture(&output.stderr),
            exit_code: output.status.code(),
        })
    }

    fn capture(&self, bytes: &[u8]) -> String {
        let text = String::from_utf8_lossy(bytes);
        let trimmed = text.trim();
        if trimmed.len() <= self.max_output_bytes {
            return trimmed.to_string();
        }
        let mut out = truncate_utf8(trimmed, self.max_output_bytes);
        out.push_str("\n... (truncated)");
        out
    }
}

#[async_trait]
impl ToolExecutor for ShellCommandTool {
    async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        if call.name != SHELL_TOOL_NAME {
            return Err(MemoryError::InvalidArgument(format!(
                "unknown tool '{}'",
                call.name
            )));
        }
        let command = call
            .arguments
            .get("command")
            .and_then(|v| v.as_str())
            .ok_or_else(|| MemoryError::InvalidArgument("missing 'command' argument".into()))?;

        tracing::debug!(call_id = %call.id, %command, "running shell command");
        let output = self.run(command).await?;

        Ok(ToolResult {
            tool_call_id: call.id.clone(),
            result: serde_json::to_value(&output)?,
            is_error: output.exit_code != Some(0),
        })
    }
}

fn tool_error(message: String) -> MemoryError {
    MemoryError::ToolExecution {
        tool_name: SHELL_TOOL_NAME.into(),
        message,
    }
}

fn truncate_utf8(s: &str, max_bytes: usize) -> String {
    if s.len() <= max_bytes {
        return s.to_string();
    }

    let mut cutoff = max_bytes;
    while cutoff > 0 && !s.is_char_boundary(cutoff) {
        cutoff -= 1;
    }
    s[..cutoff].to_string()
}
