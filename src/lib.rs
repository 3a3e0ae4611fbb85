//! # imgcls
//!
//! Single-image classification with a frozen, pretrained ImageNet classifier
//! exported to ONNX.
//!
//! One uploaded image goes in. The predicted label and its softmax
//! probability come out.
//!
//! ## Modules
//!
//! * [`core`] - Errors, constants, configuration and the ONNX Runtime engine
//! * [`processors`] - Decoding, resizing, normalization, softmax and argmax
//! * [`domain`] - Label vocabulary, score vectors and prediction results
//! * [`models`] - The classifier wrapping an inference engine
//! * [`pipeline`] - Bytes-to-prediction pipeline and its recording decorator
//! * [`storage`] - Prediction sinks (in-memory, Postgres)
//! * [`server`] - `axum` HTTP boundary
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use imgcls::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let model = ClassificationModelBuilder::new().build(Path::new("models/resnet50.onnx"))?;
//! let vocabulary = LabelVocabulary::from_file(Path::new("models/imagenet_classes.txt"))?;
//! let pipeline = ClassificationPipeline::new(model, vocabulary);
//!
//! let bytes = std::fs::read("dog.jpg")?;
//! let result = pipeline.classify_bytes(&bytes)?;
//! println!("{} ({:.3})", result.predicted_class, result.confidence_score);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod domain;
pub mod models;
pub mod pipeline;
pub mod processors;
pub mod server;
pub mod storage;

/// Prelude module for convenient imports.
///
/// ```rust
/// use imgcls::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::{
        ClassifierError, ClassifierResult, ErrorKind, InferenceEngine, PersistencePolicy,
        ServiceConfig,
    };
    pub use crate::domain::{LabelVocabulary, PredictionResult};
    pub use crate::models::{ClassificationModel, ClassificationModelBuilder};
    pub use crate::pipeline::{ClassificationPipeline, RecordingPipeline};
}
