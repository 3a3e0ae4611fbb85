//! The core module of the classification pipeline.
//!
//! This module contains the fundamental building blocks shared by every stage:
//! - Configuration management
//! - Constants describing the fixed model input
//! - Error handling
//! - ONNX Runtime inference engine
//! - Tensor aliases and the `InferenceEngine` trait

pub mod config;
pub mod constants;
pub mod errors;
pub mod inference;
pub mod tensor;
pub mod traits;

pub use config::{
    ConfigError, ConfigValidator, LabelSource, OrtSessionConfig, PersistencePolicy,
    PostgresConfig, ServiceConfig, StorageBackend,
};
pub use constants::*;
pub use errors::{ClassifierError, ClassifierResult, ErrorKind};
pub use inference::OrtInfer;
pub use tensor::{Tensor2D, Tensor4D};
pub use traits::InferenceEngine;

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and formatting layer.
/// It's typically called at the start of an application to enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
