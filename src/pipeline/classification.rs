//! Pure classification core.

use crate::core::{ClassifierResult, InferenceEngine, OrtInfer};
use crate::domain::{LabelVocabulary, PredictionResult};
use crate::models::ClassificationModel;
use crate::processors::ImagePreprocessor;
use image::DynamicImage;
use std::time::Instant;

/// Classifies one image with a frozen model and a fixed vocabulary.
///
/// The pipeline carries no per-request state. The model and vocabulary are
/// injected at construction and only read afterwards, so one instance can be
/// shared by any number of concurrent callers.
#[derive(Debug)]
pub struct ClassificationPipeline<E: InferenceEngine = OrtInfer> {
    preprocessor: ImagePreprocessor,
    model: ClassificationModel<E>,
    vocabulary: LabelVocabulary,
}

impl<E: InferenceEngine> ClassificationPipeline<E> {
    pub fn new(model: ClassificationModel<E>, vocabulary: LabelVocabulary) -> Self {
        Self::with_preprocessor(ImagePreprocessor::default(), model, vocabulary)
    }

    pub fn with_preprocessor(
        preprocessor: ImagePreprocessor,
        model: ClassificationModel<E>,
        vocabulary: LabelVocabulary,
    ) -> Self {
        Self {
            preprocessor,
            model,
            vocabulary,
        }
    }

    pub fn vocabulary(&self) -> &LabelVocabulary {
        &self.vocabulary
    }

    pub fn model(&self) -> &ClassificationModel<E> {
        &self.model
    }

    /// Decodes, classifies and labels raw image bytes.
    ///
    /// Blocks for the whole forward pass; async callers should run it on a
    /// blocking thread.
    pub fn classify_bytes(&self, raw: &[u8]) -> ClassifierResult<PredictionResult> {
        let start = Instant::now();
        let tensor = self.preprocessor.preprocess(raw)?;
        let preprocessed = start.elapsed();

        let scores = self.model.classify(&tensor)?;
        let inferred = start.elapsed();

        let result = PredictionResult::build(&scores, &self.vocabulary)?;
        tracing::debug!(
            predicted_class = %result.predicted_class,
            confidence_score = result.confidence_score,
            preprocess_ms = preprocessed.as_secs_f64() * 1000.0,
            inference_ms = (inferred - preprocessed).as_secs_f64() * 1000.0,
            "classified image"
        );
        Ok(result)
    }

    /// Classifies an image that is already decoded.
    pub fn classify_image(&self, img: &DynamicImage) -> ClassifierResult<PredictionResult> {
        let tensor = self.preprocessor.preprocess_image(img);
        let scores = self.model.classify(&tensor)?;
        PredictionResult::build(&scores, &self.vocabulary)
    }
}
