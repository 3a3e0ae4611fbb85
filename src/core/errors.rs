//! Error types for the classification pipeline.
//!
//! Every failure the pipeline can raise is a variant of [`ClassifierError`].
//! Callers that need to branch on the failure (for example the HTTP boundary
//! choosing a status code) should match on [`ClassifierError::kind`] rather
//! than on message text.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Closed set of failure categories surfaced by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input bytes are not a decodable image. Caller fault, never retried.
    Decode,
    /// The model could not evaluate the tensor (shape mismatch, runtime failure).
    Inference,
    /// Score vector and label vocabulary disagree in length.
    VocabularyMismatch,
    /// Startup configuration or model loading problem.
    Config,
    /// The persistence collaborator failed to record a prediction.
    Storage,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Decode => write!(f, "decode"),
            ErrorKind::Inference => write!(f, "inference"),
            ErrorKind::VocabularyMismatch => write!(f, "vocabulary mismatch"),
            ErrorKind::Config => write!(f, "configuration"),
            ErrorKind::Storage => write!(f, "storage"),
        }
    }
}

/// Enum representing the errors that can occur while classifying an image.
#[derive(Error, Debug)]
pub enum ClassifierError {
    /// The raw bytes could not be decoded into a pixel raster.
    #[error("image decode failed: {context}")]
    Decode {
        /// What was being decoded.
        context: String,
        /// The decoder error, absent when the payload was rejected up front.
        #[source]
        source: Option<image::ImageError>,
    },

    /// The tensor handed to the model does not have the shape it expects.
    #[error("model '{model_name}' expects input shape {expected:?}, got {actual:?}")]
    InputShape {
        model_name: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// The forward pass itself failed or produced unusable output.
    #[error("inference failed for model '{model_name}': {context}")]
    Inference {
        model_name: String,
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Score vector length differs from the label vocabulary length.
    #[error("score vector has {scores} entries but the vocabulary has {labels} labels")]
    VocabularyMismatch { scores: usize, labels: usize },

    /// A model file could not be loaded into a runtime session.
    #[error("failed to load model from '{}': {context}", path.display())]
    ModelLoad {
        path: PathBuf,
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    ConfigError { message: String },

    /// The persistence collaborator rejected or failed to store a record.
    #[error("storage: {context}")]
    Storage {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error from the ONNX Runtime session.
    #[error(transparent)]
    Session(#[from] ort::Error),

    /// Error from tensor operations.
    #[error("tensor operation")]
    Tensor(#[from] ndarray::ShapeError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

/// Convenient result alias for classification operations.
pub type ClassifierResult<T> = Result<T, ClassifierError>;

impl ClassifierError {
    /// Returns the category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Decode { .. } => ErrorKind::Decode,
            Self::InputShape { .. } | Self::Inference { .. } | Self::Tensor(_) => {
                ErrorKind::Inference
            }
            Self::Session(_) => ErrorKind::Inference,
            Self::VocabularyMismatch { .. } => ErrorKind::VocabularyMismatch,
            Self::ModelLoad { .. } | Self::ConfigError { .. } | Self::Io(_) => ErrorKind::Config,
            Self::Storage { .. } => ErrorKind::Storage,
        }
    }

    /// Creates a decode error wrapping the underlying image error.
    pub fn decode(context: impl Into<String>, error: image::ImageError) -> Self {
        Self::Decode {
            context: context.into(),
            source: Some(error),
        }
    }

    /// Creates a decode error for payloads rejected before reaching the decoder.
    pub fn decode_rejected(context: impl Into<String>) -> Self {
        Self::Decode {
            context: context.into(),
            source: None,
        }
    }

    /// Creates an inference error with an underlying cause.
    pub fn inference_error(
        model_name: &str,
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Inference {
            model_name: model_name.to_string(),
            context: context.to_string(),
            source: Some(Box::new(error)),
        }
    }

    /// Creates an inference error for invalid model output.
    pub fn invalid_output(model_name: &str, context: impl Into<String>) -> Self {
        Self::Inference {
            model_name: model_name.to_string(),
            context: context.into(),
            source: None,
        }
    }

    /// Creates an error for a model file that could not be turned into a session.
    pub fn model_load_error(
        path: &Path,
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ModelLoad {
            path: path.to_path_buf(),
            context: context.to_string(),
            source: Some(Box::new(error)),
        }
    }

    /// Creates a configuration error.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Creates a storage error.
    pub fn storage(
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Storage {
            context: context.into(),
            source: Box::new(error),
        }
    }
}

impl From<crate::core::config::ConfigError> for ClassifierError {
    fn from(error: crate::core::config::ConfigError) -> Self {
        Self::ConfigError {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let err = ClassifierError::decode_rejected("empty payload");
        assert_eq!(err.kind(), ErrorKind::Decode);

        let err = ClassifierError::InputShape {
            model_name: "resnet50".to_string(),
            expected: vec![1, 3, 224, 224],
            actual: vec![1, 3, 112, 112],
        };
        assert_eq!(err.kind(), ErrorKind::Inference);

        let err = ClassifierError::VocabularyMismatch {
            scores: 1000,
            labels: 999,
        };
        assert_eq!(err.kind(), ErrorKind::VocabularyMismatch);

        let err = ClassifierError::config_error("missing model path");
        assert_eq!(err.kind(), ErrorKind::Config);

        let err = ClassifierError::storage(
            "insert prediction",
            std::io::Error::other("connection reset"),
        );
        assert_eq!(err.kind(), ErrorKind::Storage);
    }

    #[test]
    fn test_display_messages() {
        let err = ClassifierError::VocabularyMismatch {
            scores: 3,
            labels: 2,
        };
        assert_eq!(
            err.to_string(),
            "score vector has 3 entries but the vocabulary has 2 labels"
        );

        let err = ClassifierError::decode_rejected("payload is empty");
        assert_eq!(err.to_string(), "image decode failed: payload is empty");
    }
}
