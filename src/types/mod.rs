//! Core types for pentest-memory.

pub mod message;

pub use message::*;
