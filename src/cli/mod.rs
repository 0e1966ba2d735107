//! CLI entry point for pentest-memory.

pub mod memory;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{MemoryConfig, Phase};
use crate::error::Result;

/// Inspect and reset phase conversation memory
#[derive(Parser, Debug)]
#[command(name = "pentest-memory", version, about = "Inspect agent conversation memory")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the stored transcript
    Show(ShowArgs),
    /// Show record count, size and modification time
    Stats(StoreArgs),
    /// Reset the transcript to empty
    Clear(StoreArgs),
}

/// Options selecting which store to operate on.
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Phase whose memory to use (enumeration, recon)
    #[arg(short, long, default_value = "enumeration")]
    pub phase: Phase,

    /// Memory file, overriding config and environment
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Retained message count, overriding config and environment
    #[arg(short = 'n', long)]
    pub max_messages: Option<usize>,

    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl StoreArgs {
    /// Resolve config layers, then apply command-line overrides.
    pub fn resolve(&self) -> Result<MemoryConfig> {
        let mut config = MemoryConfig::resolve_layers(self.phase, self.config.as_deref())?;
        if let Some(file) = &self.file {
            config.path = file.clone();
        }
        if let Some(max) = self.max_messages {
            config.max_messages = max;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Arguments for the `show` subcommand.
#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Print raw `{role, content}` records as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
