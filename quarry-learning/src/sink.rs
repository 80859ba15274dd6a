//! Feedback sinks: the append-only JSONL file used in production and an
//! in-memory sink for tests.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use quarry_core::errors::{FeedbackError, QuarryError};
use quarry_core::models::FeedbackRecord;
use quarry_core::traits::FeedbackSink;
use quarry_core::QuarryResult;

/// Append-only JSONL file sink, one record per line.
///
/// A batch is serialized fully before any byte is written, so a
/// serialization failure can never leave a partial batch in the log.
pub struct JsonlFeedbackSink {
    path: PathBuf,
    /// Serializes appends; batches from concurrent flushes never interleave.
    write_lock: Mutex<()>,
}

impl JsonlFeedbackSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl FeedbackSink for JsonlFeedbackSink {
    async fn append(&self, records: &[FeedbackRecord]) -> QuarryResult<()> {
        if records.is_empty() {
            return Ok(());
        }

        let mut buffer = Vec::with_capacity(records.len() * 256);
        for record in records {
            serde_json::to_writer(&mut buffer, record).map_err(|e| {
                QuarryError::from(FeedbackError::SinkWrite {
                    reason: e.to_string(),
                })
            })?;
            buffer.push(b'\n');
        }

        let _guard = self.write_lock.lock().await;
        let io_err = |e: std::io::Error| {
            QuarryError::from(FeedbackError::SinkWrite {
                reason: e.to_string(),
            })
        };

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(io_err)?;
        file.write_all(&buffer).await.map_err(io_err)?;
        file.flush().await.map_err(io_err)?;
        Ok(())
    }
}

/// In-memory sink for tests.
#[derive(Default)]
pub struct MemoryFeedbackSink {
    records: parking_lot::Mutex<Vec<FeedbackRecord>>,
}

impl MemoryFeedbackSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<FeedbackRecord> {
        self.records.lock().clone()
    }
}

#[async_trait]
impl FeedbackSink for MemoryFeedbackSink {
    async fn append(&self, records: &[FeedbackRecord]) -> QuarryResult<()> {
        self.records.lock().extend_from_slice(records);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use quarry_core::models::FeedbackOutcome;
    use quarry_core::Intent;

    fn record(result_id: &str) -> FeedbackRecord {
        FeedbackRecord {
            query_fingerprint: "b".repeat(64),
            result_id: result_id.to_string(),
            rank: 1,
            outcome: FeedbackOutcome::Click,
            timestamp: Utc::now(),
            intent: Intent::Understand,
        }
    }

    #[tokio::test]
    async fn jsonl_sink_appends_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedback.jsonl");
        let sink = JsonlFeedbackSink::new(&path);

        sink.append(&[record("doc-1"), record("doc-2")]).await.unwrap();
        sink.append(&[record("doc-3")]).await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);

        let parsed: FeedbackRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed.result_id, "doc-1");
    }

    #[tokio::test]
    async fn memory_sink_collects() {
        let sink = MemoryFeedbackSink::new();
        sink.append(&[record("doc-1")]).await.unwrap();
        assert_eq!(sink.records().len(), 1);
    }
}
