//! CLI memory command handlers for show, stats, and clear.

use crate::error::Result;
use crate::memory::{ConversationStore, FileConversationStore, LoadOutcome, MemoryStats};

use super::{ShowArgs, StoreArgs};

/// Handle `pentest-memory show`.
pub fn handle_show(args: &ShowArgs) -> Result<()> {
    let store = FileConversationStore::new(args.store.resolve()?)?;
    let outcome = store.load_detailed();
    if let LoadOutcome::Recovered { reason } = &outcome {
        eprintln!("warning: {} is unreadable ({reason})", store.path().display());
    }
    let transcript = outcome.into_transcript(store.max_messages());

    if args.json {
        let records = store.encode(transcript.messages());
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        print!("{}", render_transcript(&store, transcript.messages()));
    }
    Ok(())
}

/// Handle `pentest-memory stats`.
pub fn handle_stats(args: &StoreArgs) -> Result<()> {
    let store = FileConversationStore::new(args.resolve()?)?;
    print!("{}", render_stats(&store.stats()?, store.max_messages()));
    Ok(())
}

/// Handle `pentest-memory clear`.
pub fn handle_clear(args: &StoreArgs) -> Result<()> {
    let store = FileConversationStore::new(args.resolve()?)?;
    store.clear()?;
    println!("Cleared {}", store.path().display());
    Ok(())
}

fn render_transcript(store: &FileConversationStore, messages: &[crate::types::Message]) -> String {
    if messages.is_empty() {
        return format!("(no messages in {})\n", store.path().display());
    }
    let mut out = String::new();
    for (index, message) in messages.iter().enumerate() {
        out.push_str(&format!(
            "[{index:>3}] {}: {}\n",
            message.role,
            message.content_text()
        ));
    }
    out
}

fn render_stats(stats: &MemoryStats, max_messages: usize) -> String {
    let mut out = format!("path:      {}\n", stats.path.display());
    if !stats.exists {
        out.push_str("status:    absent\n");
        return out;
    }
    let status = if stats.corrupt { "corrupt" } else { "ok" };
    out.push_str(&format!("status:    {status}\n"));
    out.push_str(&format!("records:   {} (limit {max_messages})\n", stats.records));
    out.push_str(&format!("bytes:     {}\n", stats.bytes));
    if let Some(modified) = stats.modified {
        out.push_str(&format!("modified:  {}\n", modified.to_rfc3339()));
    }
    out
}
