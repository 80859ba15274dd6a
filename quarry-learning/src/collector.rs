//! Feedback collection: non-blocking producers, one flushing consumer.
//!
//! `record` validates and enqueues onto a bounded channel, dropping with
//! a logged warning when full. `flush` drains the channel, appends the
//! batch to the sink, then hands it to the weight store. A failed sink
//! write keeps the batch for the next flush: an enqueued record is only
//! dropped by buffer overflow, never lost in transit.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use quarry_core::config::defaults::DEFAULT_FEEDBACK_BUFFER_CAPACITY;
use quarry_core::errors::FeedbackError;
use quarry_core::models::FeedbackRecord;
use quarry_core::traits::FeedbackSink;
use quarry_core::QuarryResult;

use crate::served::ServedRegistry;
use crate::update::FeedbackEvent;
use crate::weight_store::WeightStore;

/// Bounded, non-blocking feedback collector.
pub struct FeedbackCollector {
    tx: mpsc::Sender<FeedbackRecord>,
    rx: Mutex<mpsc::Receiver<FeedbackRecord>>,
    /// Records drained but not yet durably written (sink failed).
    unflushed: Mutex<Vec<FeedbackRecord>>,
    sink: Option<Arc<dyn FeedbackSink>>,
    registry: Arc<ServedRegistry>,
    store: Arc<WeightStore>,
}

impl FeedbackCollector {
    pub fn new(
        sink: Option<Arc<dyn FeedbackSink>>,
        registry: Arc<ServedRegistry>,
        store: Arc<WeightStore>,
    ) -> Self {
        Self::with_capacity(sink, registry, store, DEFAULT_FEEDBACK_BUFFER_CAPACITY)
    }

    pub fn with_capacity(
        sink: Option<Arc<dyn FeedbackSink>>,
        registry: Arc<ServedRegistry>,
        store: Arc<WeightStore>,
        capacity: usize,
    ) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            tx,
            rx: Mutex::new(rx),
            unflushed: Mutex::new(Vec::new()),
            sink,
            registry,
            store,
        }
    }

    /// Validate and enqueue one record. Never blocks; a full buffer drops
    /// the record with a warning.
    pub fn record(&self, record: FeedbackRecord) -> Result<(), FeedbackError> {
        record.validate()?;
        self.tx.try_send(record).map_err(|e| {
            warn!("feedback buffer full, dropping record");
            match e {
                mpsc::error::TrySendError::Full(_) => FeedbackError::BufferFull,
                mpsc::error::TrySendError::Closed(_) => FeedbackError::BufferFull,
            }
        })
    }

    /// Drain the buffer, append to the sink, hand the batch to the
    /// weight store. Returns how many records were flushed.
    pub async fn flush(&self) -> QuarryResult<usize> {
        let mut records = std::mem::take(&mut *self.unflushed.lock());
        {
            let mut rx = self.rx.lock();
            while let Ok(record) = rx.try_recv() {
                records.push(record);
            }
        }
        if records.is_empty() {
            return Ok(0);
        }

        if let Some(sink) = &self.sink {
            if let Err(e) = sink.append(&records).await {
                // Keep the batch; it flushes next tick.
                warn!(error = %e, held = records.len(), "feedback sink write failed");
                *self.unflushed.lock() = records;
                return Err(e);
            }
        }

        let count = records.len();
        let events: Vec<FeedbackEvent> = records
            .into_iter()
            .map(|record| FeedbackEvent {
                factors: self
                    .registry
                    .lookup(&record.query_fingerprint, &record.result_id),
                record,
            })
            .collect();
        self.store.observe(events);

        debug!(count, "feedback flushed");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemoryFeedbackSink;
    use chrono::Utc;
    use quarry_core::config::{LearningConfig, RankingConfig};
    use quarry_core::models::FeedbackOutcome;
    use quarry_core::Intent;

    fn record(rank: u32) -> FeedbackRecord {
        FeedbackRecord {
            query_fingerprint: "c".repeat(64),
            result_id: "doc".into(),
            rank,
            outcome: FeedbackOutcome::Click,
            timestamp: Utc::now(),
            intent: Intent::Test,
        }
    }

    fn collector(capacity: usize) -> (FeedbackCollector, Arc<MemoryFeedbackSink>) {
        let sink = Arc::new(MemoryFeedbackSink::new());
        let store = Arc::new(WeightStore::new(
            &RankingConfig::default(),
            &LearningConfig::default(),
        ));
        let c = FeedbackCollector::with_capacity(
            Some(sink.clone()),
            Arc::new(ServedRegistry::default()),
            store,
            capacity,
        );
        (c, sink)
    }

    #[tokio::test]
    async fn enqueued_records_reach_the_sink() {
        let (collector, sink) = collector(16);
        collector.record(record(1)).unwrap();
        collector.record(record(2)).unwrap();

        let flushed = collector.flush().await.unwrap();
        assert_eq!(flushed, 2);
        assert_eq!(sink.records().len(), 2);

        // Nothing left behind.
        assert_eq!(collector.flush().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn invalid_records_are_rejected_before_the_buffer() {
        let (collector, sink) = collector(16);
        assert!(collector.record(record(0)).is_err());
        assert!(collector
            .record(FeedbackRecord {
                query_fingerprint: "short".into(),
                ..record(1)
            })
            .is_err());
        collector.flush().await.unwrap();
        assert!(sink.records().is_empty());
    }

    #[tokio::test]
    async fn overflow_drops_with_error() {
        let (collector, _sink) = collector(2);
        assert!(collector.record(record(1)).is_ok());
        assert!(collector.record(record(2)).is_ok());
        let err = collector.record(record(3)).unwrap_err();
        assert!(matches!(err, FeedbackError::BufferFull));
    }
}
