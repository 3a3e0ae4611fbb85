//! In-process prediction storage.

use super::{NewPrediction, PredictionId, PredictionRecord, PredictionSink};
use crate::core::{ClassifierResult, MEMORY_SINK_CAPACITY};
use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct MemoryState {
    records: VecDeque<PredictionRecord>,
    last_id: PredictionId,
}

/// Keeps the most recent records in memory for the lifetime of the process.
///
/// Once `capacity` records are held, each new record evicts the oldest one.
/// Ids keep increasing across evictions.
#[derive(Debug)]
pub struct MemoryPredictionSink {
    state: RwLock<MemoryState>,
    capacity: usize,
}

impl Default for MemoryPredictionSink {
    fn default() -> Self {
        Self::with_capacity(MEMORY_SINK_CAPACITY)
    }
}

impl MemoryPredictionSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: RwLock::new(MemoryState::default()),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshot of the retained records, oldest first.
    pub async fn records(&self) -> Vec<PredictionRecord> {
        self.state.read().await.records.iter().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.records.is_empty()
    }
}

#[async_trait]
impl PredictionSink for MemoryPredictionSink {
    async fn record(&self, prediction: NewPrediction) -> ClassifierResult<PredictionId> {
        let mut state = self.state.write().await;
        state.last_id += 1;
        let id = state.last_id;
        if state.records.len() == self.capacity {
            state.records.pop_front();
        }
        state.records.push_back(PredictionRecord {
            id,
            image_name: prediction.image_name,
            predicted_class: prediction.predicted_class,
            confidence_score: prediction.confidence_score,
        });
        Ok(id)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(name: &str, class: &str, score: f32) -> NewPrediction {
        NewPrediction {
            image_name: name.to_string(),
            predicted_class: class.to_string(),
            confidence_score: score,
        }
    }

    #[tokio::test]
    async fn test_record_assigns_sequential_ids() {
        let sink = MemoryPredictionSink::new();
        assert!(sink.is_empty().await);
        assert_eq!(sink.capacity(), MEMORY_SINK_CAPACITY);

        let first = sink.record(prediction("a.png", "cat", 0.8)).await.unwrap();
        let second = sink.record(prediction("b.png", "dog", 0.6)).await.unwrap();
        assert_eq!((first, second), (1, 2));

        let records = sink.records().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].image_name, "b.png");
        assert_eq!(records[1].predicted_class, "dog");
        assert_eq!(records[1].confidence_score, 0.6);
    }

    #[tokio::test]
    async fn test_oldest_records_are_evicted_at_capacity() {
        let sink = MemoryPredictionSink::with_capacity(2);
        for name in ["a.png", "b.png", "c.png"] {
            sink.record(prediction(name, "cat", 0.5)).await.unwrap();
        }

        let records = sink.records().await;
        assert_eq!(sink.len().await, 2);
        assert_eq!(
            records.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![2, 3]
        );
        assert_eq!(records[0].image_name, "b.png");

        let next = sink.record(prediction("d.png", "dog", 0.9)).await.unwrap();
        assert_eq!(next, 4);
    }

    #[tokio::test]
    async fn test_zero_capacity_still_keeps_latest() {
        let sink = MemoryPredictionSink::with_capacity(0);
        sink.record(prediction("a.png", "cat", 0.5)).await.unwrap();
        sink.record(prediction("b.png", "dog", 0.5)).await.unwrap();
        assert_eq!(sink.len().await, 1);
        assert_eq!(sink.records().await[0].image_name, "b.png");
    }
}
