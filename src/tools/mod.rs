//! Tools the agent can call during a turn.

pub mod shell;

pub use shell::{CommandOutput, ShellCommandTool, SHELL_TOOL_NAME};
