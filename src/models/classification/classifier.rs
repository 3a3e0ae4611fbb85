//! Frozen ImageNet classifier.
//!
//! This module wraps a pretrained classifier (for example a ResNet-50 exported
//! to ONNX) behind [`ClassificationModel`]. The exported graph is an inference
//! graph: it has no gradient bookkeeping and no training-mode layers, so
//! evaluating it can never update running statistics or weights.

use crate::core::config::OrtSessionConfig;
use crate::core::{
    ClassifierError, ClassifierResult, InferenceEngine, MODEL_INPUT_SHAPE, OrtInfer, Tensor4D,
};
use crate::domain::ScoreVector;
use std::path::Path;

/// Classifier producing a probability distribution for one image tensor.
#[derive(Debug)]
pub struct ClassificationModel<E: InferenceEngine = OrtInfer> {
    /// Inference engine evaluating the frozen weights
    engine: E,
    /// Shape every input tensor must have
    expected_input: Vec<usize>,
}

impl<E: InferenceEngine> ClassificationModel<E> {
    /// Wraps an engine.
    ///
    /// The expected input shape comes from the engine when it declares a
    /// static one, otherwise from the pipeline's fixed `1 x 3 x 224 x 224`.
    pub fn new(engine: E) -> Self {
        let expected_input = engine
            .expected_input_shape()
            .unwrap_or_else(|| MODEL_INPUT_SHAPE.to_vec());
        if expected_input != MODEL_INPUT_SHAPE {
            tracing::warn!(
                engine = %engine.engine_info(),
                expected = ?expected_input,
                preprocessed = ?MODEL_INPUT_SHAPE,
                "model input shape differs from the preprocessed tensor shape"
            );
        }
        Self {
            engine,
            expected_input,
        }
    }

    /// Shape the model accepts.
    pub fn expected_input_shape(&self) -> &[usize] {
        &self.expected_input
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Description of the underlying engine.
    pub fn engine_info(&self) -> String {
        self.engine.engine_info()
    }

    /// Runs a forward pass and returns class probabilities.
    ///
    /// # Errors
    ///
    /// * [`ClassifierError::InputShape`] if `tensor` does not match the model input.
    /// * [`ClassifierError::Inference`] if the engine fails or returns anything
    ///   other than one finite row of logits.
    pub fn classify(&self, tensor: &Tensor4D) -> ClassifierResult<ScoreVector> {
        if tensor.shape() != self.expected_input.as_slice() {
            return Err(ClassifierError::InputShape {
                model_name: self.engine.engine_info(),
                expected: self.expected_input.clone(),
                actual: tensor.shape().to_vec(),
            });
        }

        let logits = self.engine.infer(tensor)?;

        let (rows, classes) = logits.dim();
        if rows != 1 || classes == 0 {
            return Err(ClassifierError::invalid_output(
                &self.engine.engine_info(),
                format!("expected logits of shape [1, N>0], got [{rows}, {classes}]"),
            ));
        }

        let row: Vec<f32> = logits.row(0).to_vec();
        if let Some(idx) = row.iter().position(|v| !v.is_finite()) {
            return Err(ClassifierError::invalid_output(
                &self.engine.engine_info(),
                format!("non-finite logit {} at class index {idx}", row[idx]),
            ));
        }

        Ok(ScoreVector::from_logits(&row))
    }
}

/// Builder for an ONNX-backed classification model.
#[derive(Debug)]
pub struct ClassificationModelBuilder {
    /// Session pool size for ONNX Runtime
    session_pool_size: usize,
    /// Input tensor name, discovered from the model when unset
    input_name: Option<String>,
    /// ONNX Runtime session configuration
    ort_config: Option<OrtSessionConfig>,
}

impl Default for ClassificationModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassificationModelBuilder {
    /// Creates a new builder with a single session.
    pub fn new() -> Self {
        Self {
            session_pool_size: 1,
            input_name: None,
            ort_config: None,
        }
    }

    /// Sets the session pool size for ONNX Runtime.
    pub fn session_pool_size(mut self, size: usize) -> Self {
        self.session_pool_size = size;
        self
    }

    /// Sets the model's input tensor name.
    pub fn input_name(mut self, name: impl Into<String>) -> Self {
        self.input_name = Some(name.into());
        self
    }

    /// Sets the ONNX Runtime session configuration.
    pub fn with_ort_config(mut self, config: OrtSessionConfig) -> Self {
        self.ort_config = Some(config);
        self
    }

    /// Loads the model file and builds the classifier.
    pub fn build(self, model_path: &Path) -> ClassifierResult<ClassificationModel<OrtInfer>> {
        let inference = OrtInfer::from_config(
            model_path,
            self.input_name.as_deref(),
            self.ort_config.as_ref(),
            self.session_pool_size,
        )?;
        Ok(ClassificationModel::new(inference))
    }
}
