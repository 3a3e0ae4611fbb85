//! Service-level configuration.
//!
//! A [`ServiceConfig`] is usually read from a JSON file and then overridden
//! field by field from the command line. Every field has a default, so an
//! empty JSON object is a valid configuration.

use super::errors::{ConfigError, ConfigValidator};
use super::onnx::OrtSessionConfig;
use crate::core::constants::{DEFAULT_LABELS_URL, DEFAULT_MAX_UPLOAD_BYTES};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where the label vocabulary is read from at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelSource {
    /// Local text file, one label per line.
    Path(PathBuf),
    /// Remote text resource fetched once over HTTP(S).
    Url(String),
}

impl Default for LabelSource {
    fn default() -> Self {
        Self::Url(DEFAULT_LABELS_URL.to_string())
    }
}

/// What the service does when recording a prediction fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistencePolicy {
    /// Fail the whole request with a server error.
    FailRequest,
    /// Log the failure and still return the prediction.
    #[default]
    LogAndContinue,
}

impl std::str::FromStr for PersistencePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fail_request" | "fail-request" => Ok(Self::FailRequest),
            "log_and_continue" | "log-and-continue" => Ok(Self::LogAndContinue),
            other => Err(ConfigError::InvalidConfig {
                message: format!(
                    "unknown persistence policy '{other}', expected 'fail_request' or 'log_and_continue'"
                ),
            }),
        }
    }
}

/// Postgres connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostgresConfig {
    /// postgres://[user[:password]@][netloc][:port][/dbname][?param1=value1&...]
    pub db_url: String,
    /// Maximum number of pooled connections.
    #[serde(default = "PostgresConfig::default_pool_max")]
    pub pool_max: usize,
}

impl PostgresConfig {
    pub fn new(db_url: impl Into<String>) -> Self {
        Self {
            db_url: db_url.into(),
            pool_max: Self::default_pool_max(),
        }
    }

    pub fn default_pool_max() -> usize {
        16
    }
}

/// Backend that receives prediction records.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Predictions are returned but never recorded.
    #[default]
    Disabled,
    /// Predictions are kept in process memory, bounded to the most recent
    /// records. Meant for development and tests; nothing survives a restart.
    Memory,
    /// Predictions are written to a Postgres table.
    Postgres(PostgresConfig),
}

/// Top-level configuration of the classification service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Address the HTTP listener binds to.
    pub host: String,
    /// Port the HTTP listener binds to.
    pub port: u16,
    /// Path to the ONNX export of the frozen classifier.
    pub model_path: PathBuf,
    /// Name of the model's input tensor; discovered from the model when unset.
    pub model_input_name: Option<String>,
    /// Source of the ordered label vocabulary.
    pub labels: LabelSource,
    /// Number of independent runtime sessions serving forward passes.
    pub session_pool_size: usize,
    /// ONNX Runtime tuning.
    pub ort_session: Option<OrtSessionConfig>,
    /// Largest accepted request body in bytes.
    pub max_upload_bytes: usize,
    /// Where prediction records go.
    pub storage: StorageBackend,
    /// Behavior when recording a prediction fails.
    pub persistence_policy: PersistencePolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            model_path: PathBuf::from("models/resnet50.onnx"),
            model_input_name: None,
            labels: LabelSource::default(),
            session_pool_size: 1,
            ort_session: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            storage: StorageBackend::default(),
            persistence_policy: PersistencePolicy::default(),
        }
    }
}

impl ServiceConfig {
    /// Reads a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Socket address string the listener binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl ConfigValidator for ServiceConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_model_path(&self.model_path)?;
        self.validate_thread_count(self.session_pool_size)?;
        self.validate_positive_usize(self.max_upload_bytes, "max_upload_bytes")?;

        if let Some(ort) = &self.ort_session {
            if let Some(intra) = ort.intra_threads {
                self.validate_thread_count(intra)?;
            }
            if let Some(inter) = ort.inter_threads {
                self.validate_thread_count(inter)?;
            }
        }

        match &self.labels {
            LabelSource::Path(path) if !path.is_file() => {
                return Err(ConfigError::InvalidConfig {
                    message: format!("label file not found: {}", path.display()),
                });
            }
            LabelSource::Url(url) if url.trim().is_empty() => {
                return Err(ConfigError::InvalidConfig {
                    message: "label URL must not be empty".to_string(),
                });
            }
            _ => {}
        }

        if let StorageBackend::Postgres(pg) = &self.storage {
            if pg.db_url.trim().is_empty() {
                return Err(ConfigError::InvalidConfig {
                    message: "postgres db_url must not be empty".to_string(),
                });
            }
            self.validate_positive_usize(pg.pool_max, "pool_max")?;
        }

        Ok(())
    }
}
