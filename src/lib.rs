//! pentest-memory — conversation memory for LLM-driven penetration testing
//!
//! Persists the transcript of an agent phase (enumeration, reconnaissance)
//! to a JSON file, keeps only the most recent messages, and rebuilds typed
//! messages on load. Corrupt or missing history never blocks a session;
//! failed writes are reported.
//!
//! # Quick Start
//!
//! ```no_run
//! use pentest_memory::prelude::*;
//!
//! # fn example() -> pentest_memory::error::Result<()> {
//! let store = FileConversationStore::new(MemoryConfig::from_env(Phase::Enumeration)?)?;
//! let mut history = store.load().into_messages();
//! history.push(Message::human("enumerate SMB shares on 10.0.0.5"));
//! store.save(&history)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod memory;
pub mod prelude;
pub mod tools;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
