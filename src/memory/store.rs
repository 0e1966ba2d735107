//! File-backed conversation store.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::record::MemoryRecord;
use super::transcript::Transcript;
use crate::config::MemoryConfig;
use crate::error::{MemoryError, Result};
use crate::types::Message;
use crate::util::fs::atomic_write;

/// Storage abstraction for a persisted conversation transcript.
///
/// `load` never fails: absent or unreadable storage yields an empty
/// transcript. `save` and `clear` surface write failures to the caller.
pub trait ConversationStore: Send + Sync {
    /// Load the transcript and report how it was obtained.
    fn load_detailed(&self) -> LoadOutcome;

    /// Replace the stored transcript with the last `max_messages` of `messages`.
    fn save(&self, messages: &[Message]) -> Result<()>;

    /// Reset storage to an empty transcript.
    fn clear(&self) -> Result<()>;

    fn max_messages(&self) -> usize;

    fn load(&self) -> Transcript {
        self.load_detailed().into_transcript(self.max_messages())
    }
}

/// Result of reading a store.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Storage was read and parsed.
    Loaded(Transcript),
    /// No storage exists yet.
    Missing,
    /// Storage exists but could not be read or parsed.
    Recovered { reason: String },
}

impl LoadOutcome {
    pub fn into_transcript(self, max_messages: usize) -> Transcript {
        match self {
            Self::Loaded(transcript) => transcript,
            Self::Missing | Self::Recovered { .. } => Transcript::new(max_messages),
        }
    }

    pub fn is_recovered(&self) -> bool {
        matches!(self, Self::Recovered { .. })
    }
}

/// Summary of what a store currently holds on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryStats {
    pub path: PathBuf,
    pub exists: bool,
    /// Parsed record count, before any load-side truncation.
    pub records: usize,
    pub bytes: u64,
    pub modified: Option<DateTime<Utc>>,
    pub corrupt: bool,
}

/// Conversation store persisted as a JSON array of `{role, content}` records.
///
/// # Example
/// ```no_run
/// use pentest_memory::config::{MemoryConfig, Phase};
/// use pentest_memory::memory::{ConversationStore, FileConversationStore};
/// use pentest_memory::types::Message;
///
/// let store = FileConversationStore::new(MemoryConfig::for_phase(Phase::Recon))?;
/// let mut history = store.load().into_messages();
/// history.push(Message::human("scan 10.0.0.5"));
/// history.push(Message::ai("Starting with a TCP SYN scan."));
/// store.save(&history)?;
/// # Ok::<(), pentest_memory::error::MemoryError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileConversationStore {
    path: PathBuf,
    max_messages: usize,
}

impl FileConversationStore {
    pub fn new(config: MemoryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            path: config.path,
            max_messages: config.max_messages,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_records(&self) -> std::result::Result<Option<Vec<MemoryRecord>>, String> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.to_string()),
        };
        parse_records(&raw).map(Some)
    }

    /// Inspect the stored file without truncating.
    pub fn stats(&self) -> Result<MemoryStats> {
        let metadata = match fs::metadata(&self.path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Ok(MemoryStats {
                    path: self.path.clone(),
                    exists: false,
                    records: 0,
                    bytes: 0,
                    modified: None,
                    corrupt: false,
                });
            }
            Err(err) => return Err(MemoryError::Io(err)),
        };
        let (records, corrupt) = match self.read_records() {
            Ok(records) => (records.map_or(0, |r| r.len()), false),
            Err(_) => (0, true),
        };
        Ok(MemoryStats {
            path: self.path.clone(),
            exists: true,
            records,
            bytes: metadata.len(),
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            corrupt,
        })
    }

    /// Raw records as they would be written for `messages`.
    pub fn encode(&self, messages: &[Message]) -> Vec<MemoryRecord> {
        let skip = messages.len().saturating_sub(self.max_messages);
        messages[skip..].iter().map(MemoryRecord::from).collect()
    }

    fn write_records(&self, records: &[MemoryRecord]) -> Result<()> {
        let serialized = serde_json::to_vec_pretty(records)?;
        atomic_write(&self.path, &serialized)
    }
}

impl ConversationStore for FileConversationStore {
    fn load_detailed(&self) -> LoadOutcome {
        match self.read_records() {
            Ok(None) => {
                tracing::debug!(path = %self.path.display(), "no conversation memory on disk");
                LoadOutcome::Missing
            }
            Ok(Some(records)) => {
                let total = records.len();
                let transcript = Transcript::from_tail(
                    records.into_iter().map(MemoryRecord::into_message),
                    self.max_messages,
                );
                tracing::debug!(
                    path = %self.path.display(),
                    records = total,
                    kept = transcript.len(),
                    "loaded conversation memory"
                );
                LoadOutcome::Loaded(transcript)
            }
            Err(reason) => {
                tracing::warn!(
                    path = %self.path.display(),
                    %reason,
                    "conversation memory unreadable, starting empty"
                );
                LoadOutcome::Recovered { reason }
            }
        }
    }

    fn save(&self, messages: &[Message]) -> Result<()> {
        let records = self.encode(messages);
        self.write_records(&records)?;
        tracing::debug!(
            path = %self.path.display(),
            records = records.len(),
            dropped = messages.len() - records.len(),
            "saved conversation memory"
        );
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.write_records(&[])?;
        tracing::debug!(path = %self.path.display(), "cleared conversation memory");
        Ok(())
    }

    fn max_messages(&self) -> usize {
        self.max_messages
    }
}

/// Parse a JSON array whose elements are all objects.
fn parse_records(raw: &[u8]) -> std::result::Result<Vec<MemoryRecord>, String> {
    let items: Vec<Map<String, Value>> =
        serde_json::from_slice(raw).map_err(|err| err.to_string())?;
    items
        .into_iter()
        .map(|item| serde_json::from_value(Value::Object(item)).map_err(|err| err.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn temp_store(max_messages: usize) -> (TempDir, FileConversationStore) {
        let dir = TempDir::new().unwrap();
        let config = MemoryConfig::builder()
            .path(dir.path().join("memory.json"))
            .max_messages(max_messages)
            .build();
        (dir, FileConversationStore::new(config).unwrap())
    }

    #[test]
    fn zero_bound_is_rejected() {
        let config = MemoryConfig::builder().path("memory.json").max_messages(0).build();
        assert!(matches!(
            FileConversationStore::new(config),
            Err(MemoryError::Configuration(_))
        ));
    }

    #[test]
    fn missing_file_loads_as_missing() {
        let (_dir, store) = temp_store(200);
        assert_eq!(store.load_detailed(), LoadOutcome::Missing);
        assert!(store.load().is_empty());
    }

    #[test]
    fn corrupt_file_is_recovered() {
        let (_dir, store) = temp_store(200);
        fs::write(store.path(), b"\x00\xffnot json at all").unwrap();
        assert!(store.load_detailed().is_recovered());
        assert!(store.load().is_empty());
    }

    #[test]
    fn empty_file_is_recovered() {
        let (_dir, store) = temp_store(200);
        fs::write(store.path(), b"").unwrap();
        assert!(store.load_detailed().is_recovered());
    }

    #[test]
    fn non_object_elements_are_recovered() {
        let (_dir, store) = temp_store(200);
        fs::write(store.path(), br#"[{"role": "ai", "content": "ok"}, ["human", "hi"]]"#).unwrap();
        assert!(store.load_detailed().is_recovered());
    }

    #[test]
    fn top_level_object_is_recovered() {
        let (_dir, store) = temp_store(200);
        fs::write(store.path(), br#"{"role": "ai", "content": "ok"}"#).unwrap();
        assert!(store.load_detailed().is_recovered());
    }

    #[test]
    fn clear_writes_empty_array() {
        let (_dir, store) = temp_store(200);
        store.save(&[Message::human("hi")]).unwrap();
        store.clear().unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "[]");
        assert_eq!(store.load_detailed(), LoadOutcome::Loaded(Transcript::new(200)));
    }

    #[test]
    fn file_is_pretty_printed_records() {
        let (_dir, store) = temp_store(200);
        store.save(&[Message::human("hi")]).unwrap();
        let raw = fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, "[\n  {\n    \"role\": \"human\",\n    \"content\": \"hi\"\n  }\n]");
    }

    #[test]
    fn load_truncates_files_written_with_a_larger_bound() {
        let (_dir, store) = temp_store(2);
        let records: Vec<_> = (0..5)
            .map(|i| MemoryRecord::new("ai", format!("r{i}")))
            .collect();
        fs::write(store.path(), serde_json::to_vec(&records).unwrap()).unwrap();

        let transcript = store.load();
        let texts: Vec<_> = transcript.iter().filter_map(Message::text).collect();
        assert_eq!(texts, vec!["r3", "r4"]);
        assert!(transcript.iter().all(|m| m.role == Role::Ai));
    }

    #[test]
    fn stats_reports_raw_record_count() {
        let (_dir, store) = temp_store(2);
        let absent = store.stats().unwrap();
        assert!(!absent.exists);
        assert_eq!(absent.records, 0);

        let records: Vec<_> = (0..5).map(|i| MemoryRecord::new("human", i.to_string())).collect();
        fs::write(store.path(), serde_json::to_vec(&records).unwrap()).unwrap();
        let stats = store.stats().unwrap();
        assert!(stats.exists);
        assert_eq!(stats.records, 5);
        assert!(!stats.corrupt);
        assert!(stats.bytes > 0);
        assert!(stats.modified.is_some());
    }

    #[test]
    fn stats_flags_corrupt_file() {
        let (_dir, store) = temp_store(200);
        fs::write(store.path(), "{{{").unwrap();
        let stats = store.stats().unwrap();
        assert!(stats.corrupt);
        assert_eq!(stats.records, 0);
    }
}
