//! Persistence of prediction records.
//!
//! The classification pipeline never depends on storage. A [`PredictionSink`]
//! is handed a finished prediction plus the uploaded file name and records it
//! somewhere; nothing is ever read back on the request path.

pub mod memory;
pub mod postgres;

use crate::core::MAX_RECORD_TEXT_LEN;
use crate::core::{ClassifierResult, PostgresConfig, StorageBackend};
use crate::domain::PredictionResult;
use async_trait::async_trait;
use std::sync::Arc;

pub use memory::MemoryPredictionSink;
pub use postgres::PostgresPredictionSink;

/// Identity key assigned by a sink.
pub type PredictionId = i64;

/// A prediction about to be recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPrediction {
    pub image_name: String,
    pub predicted_class: String,
    pub confidence_score: f32,
}

impl NewPrediction {
    /// Pairs a result with the uploaded file name.
    ///
    /// Text fields are cut to the column width on a character boundary.
    pub fn new(image_name: &str, result: &PredictionResult) -> Self {
        Self {
            image_name: truncate_chars(image_name, MAX_RECORD_TEXT_LEN),
            predicted_class: truncate_chars(&result.predicted_class, MAX_RECORD_TEXT_LEN),
            confidence_score: result.confidence_score,
        }
    }
}

/// A recorded prediction with its identity key.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    pub id: PredictionId,
    pub image_name: String,
    pub predicted_class: String,
    pub confidence_score: f32,
}

/// Destination for prediction records.
#[async_trait]
pub trait PredictionSink: Send + Sync + std::fmt::Debug {
    /// Durably records a prediction and returns its identity key.
    async fn record(&self, prediction: NewPrediction) -> ClassifierResult<PredictionId>;

    /// Short name used in logs.
    fn backend_name(&self) -> &'static str;
}

/// Builds the sink selected by configuration, or `None` when disabled.
pub async fn connect(backend: &StorageBackend) -> ClassifierResult<Option<Arc<dyn PredictionSink>>> {
    let sink: Arc<dyn PredictionSink> = match backend {
        StorageBackend::Disabled => return Ok(None),
        StorageBackend::Memory => Arc::new(MemoryPredictionSink::new()),
        StorageBackend::Postgres(config) => Arc::new(connect_postgres(config).await?),
    };
    tracing::info!(backend = sink.backend_name(), "prediction storage enabled");
    Ok(Some(sink))
}

async fn connect_postgres(config: &PostgresConfig) -> ClassifierResult<PostgresPredictionSink> {
    PostgresPredictionSink::connect(config).await
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}
