//! JSONL transcript writer for conversation events.
//!
//! Each [`ConversationEvent`] is serialized as a single JSON line with a
//! `type` field and `timestamp`, appended to the file via a buffered writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use symposium_application::{ConversationEvent, ConversationLogger};
use tracing::warn;

/// Transcript logger that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every event
/// and on `Drop`.
pub struct JsonlConversationLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Create a logger writing to the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be created; transcripts are
    /// best-effort and never block a conversation.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create transcript directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match File::create(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not create transcript file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Create a timestamped transcript file inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Option<Self> {
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S%.3f");
        Self::new(
            dir.as_ref()
                .join(format!("symposium-{}.conversation.jsonl", stamp)),
        )
    }

    /// Get the path to the transcript file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        // Merge payload with type + timestamp
        let record = if let serde_json::Value::Object(mut map) = event.payload {
            map.insert(
                "type".to_string(),
                serde_json::Value::String(event.event_type.to_string()),
            );
            map.insert(
                "timestamp".to_string(),
                serde_json::Value::String(timestamp),
            );
            serde_json::Value::Object(map)
        } else {
            serde_json::json!({
                "type": event.event_type,
                "timestamp": timestamp,
                "data": event.payload,
            })
        };

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock()
            && let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush())
        {
            warn!("Transcript write to {} failed: {}", self.path.display(), e);
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use symposium_domain::{CleanedResponse, ConversationState, Turn};

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_record_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.conversation.jsonl");
        let logger = JsonlConversationLogger::new(&path).unwrap();

        let turn = Turn::new(
            0,
            "socrates".into(),
            1,
            CleanedResponse {
                visible_text: "What is virtue?".to_string(),
                reasoning_text: Some("start simple".to_string()),
            },
        );
        logger.log(ConversationEvent::turn_recorded(&turn));
        logger.log(ConversationEvent::conversation_finished(
            &ConversationState::idle(),
        ));
        drop(logger);

        let records = read_lines(&path);
        assert_eq!(records.len(), 2);
        for record in &records {
            assert!(record.get("type").is_some());
            assert!(record.get("timestamp").is_some());
        }
        assert_eq!(records[0]["type"], "turn_recorded");
        assert_eq!(records[0]["speaker"], "socrates");
        assert_eq!(records[0]["visible_text"], "What is virtue?");
        assert_eq!(records[0]["reasoning_text"], "start simple");
        assert_eq!(records[1]["type"], "conversation_completed");
    }

    #[test]
    fn test_non_object_payload_is_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wrapped.conversation.jsonl");
        let logger = JsonlConversationLogger::new(&path).unwrap();

        logger.log(ConversationEvent::new(
            "note",
            serde_json::json!("just a string"),
        ));
        drop(logger);

        let records = read_lines(&path);
        assert_eq!(records[0]["type"], "note");
        assert_eq!(records[0]["data"], "just a string");
    }

    #[test]
    fn test_in_dir_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("transcripts").join("today");
        let logger = JsonlConversationLogger::in_dir(&nested).unwrap();

        assert!(logger.path().starts_with(&nested));
        assert!(logger
            .path()
            .to_string_lossy()
            .ends_with(".conversation.jsonl"));
        assert!(logger.path().exists());
    }

    #[test]
    fn test_unwritable_location_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "").unwrap();
        // A regular file cannot act as a parent directory
        assert!(JsonlConversationLogger::new(blocker.join("log.jsonl")).is_none());
    }
}
