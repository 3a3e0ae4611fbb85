//! Optional persistence around the classification core.

use super::ClassificationPipeline;
use crate::core::{ClassifierError, ClassifierResult, InferenceEngine, OrtInfer, PersistencePolicy};
use crate::domain::PredictionResult;
use crate::storage::{NewPrediction, PredictionId, PredictionSink};
use std::sync::Arc;

/// Runs the shared [`ClassificationPipeline`] and records each result.
///
/// Recording happens only after a prediction exists, so a failed
/// classification never leaves a record behind. What happens when the
/// recording itself fails is decided by the [`PersistencePolicy`].
#[derive(Debug)]
pub struct RecordingPipeline<E: InferenceEngine = OrtInfer> {
    pipeline: Arc<ClassificationPipeline<E>>,
    sink: Option<Arc<dyn PredictionSink>>,
    policy: PersistencePolicy,
}

impl<E: InferenceEngine> Clone for RecordingPipeline<E> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
            sink: self.sink.clone(),
            policy: self.policy,
        }
    }
}

impl<E: InferenceEngine + 'static> RecordingPipeline<E> {
    pub fn new(
        pipeline: Arc<ClassificationPipeline<E>>,
        sink: Option<Arc<dyn PredictionSink>>,
        policy: PersistencePolicy,
    ) -> Self {
        Self {
            pipeline,
            sink,
            policy,
        }
    }

    /// A pipeline that never records anything.
    pub fn without_storage(pipeline: Arc<ClassificationPipeline<E>>) -> Self {
        Self::new(pipeline, None, PersistencePolicy::default())
    }

    pub fn pipeline(&self) -> &ClassificationPipeline<E> {
        &self.pipeline
    }

    pub fn policy(&self) -> PersistencePolicy {
        self.policy
    }

    pub fn has_storage(&self) -> bool {
        self.sink.is_some()
    }

    /// Classifies `raw` on the blocking pool, then records the result under
    /// `image_name`.
    ///
    /// # Errors
    ///
    /// Any pipeline error is returned unchanged. A storage error is returned
    /// only under [`PersistencePolicy::FailRequest`].
    pub async fn predict<B>(&self, image_name: &str, raw: B) -> ClassifierResult<PredictionResult>
    where
        B: AsRef<[u8]> + Send + 'static,
    {
        let pipeline = Arc::clone(&self.pipeline);
        let result = tokio::task::spawn_blocking(move || pipeline.classify_bytes(raw.as_ref()))
            .await
            .map_err(|e| {
                ClassifierError::inference_error(
                    &self.pipeline.model().engine_info(),
                    "classification task did not complete",
                    e,
                )
            })??;

        self.record(image_name, &result).await?;
        Ok(result)
    }

    /// Records a finished prediction according to the policy.
    ///
    /// Returns the new record's id, or `None` when storage is disabled or the
    /// failure was logged and swallowed.
    pub async fn record(
        &self,
        image_name: &str,
        result: &PredictionResult,
    ) -> ClassifierResult<Option<PredictionId>> {
        let Some(sink) = &self.sink else {
            return Ok(None);
        };

        match sink.record(NewPrediction::new(image_name, result)).await {
            Ok(id) => {
                tracing::debug!(id, backend = sink.backend_name(), "recorded prediction");
                Ok(Some(id))
            }
            Err(e) => match self.policy {
                PersistencePolicy::FailRequest => Err(e),
                PersistencePolicy::LogAndContinue => {
                    tracing::warn!(
                        error = %e,
                        backend = sink.backend_name(),
                        image_name,
                        "failed to record prediction, returning it anyway"
                    );
                    Ok(None)
                }
            },
        }
    }
}
