//! Configuration management for the classification service.
//!
//! This module provides configuration types, validation traits, and utilities
//! for loading the service configuration from JSON.

pub mod errors;
pub mod onnx;
pub mod service;

pub use errors::{ConfigError, ConfigValidator};
pub use onnx::*;
pub use service::{LabelSource, PersistencePolicy, PostgresConfig, ServiceConfig, StorageBackend};
