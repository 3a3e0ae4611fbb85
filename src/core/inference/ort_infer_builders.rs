use super::*;
use crate::core::config::{OrtExecutionProvider, OrtGraphOptimizationLevel, OrtSessionConfig};
use ort::execution_providers::ExecutionProviderDispatch;
use ort::logging::LogLevel;
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use std::path::Path;

impl OrtInfer {
    /// Creates a new OrtInfer instance with default ONNX Runtime settings and a single session.
    pub fn new(model_path: impl AsRef<Path>, input_name: Option<&str>) -> Result<Self, ClassifierError> {
        Self::from_config(model_path, input_name, None, 1)
    }

    /// Creates a new OrtInfer instance, applying ORT session configuration and
    /// constructing a session pool for concurrent predictions.
    ///
    /// When `input_name` is `None` the model's first declared input is used.
    pub fn from_config(
        model_path: impl AsRef<Path>,
        input_name: Option<&str>,
        ort_config: Option<&OrtSessionConfig>,
        pool_size: usize,
    ) -> Result<Self, ClassifierError> {
        let path = model_path.as_ref();
        let pool_size = pool_size.max(1);
        let mut sessions = Vec::with_capacity(pool_size);
        for _ in 0..pool_size {
            let builder = Session::builder()?;
            let builder = match ort_config {
                Some(cfg) => Self::apply_ort_config(builder, cfg)?,
                // Set default log level to Error to suppress ORT logs
                None => builder.with_log_level(LogLevel::Error)?,
            };
            let session = builder.commit_from_file(path).map_err(|e| {
                ClassifierError::model_load_error(
                    path,
                    "failed to create ONNX session; check the model file and execution provider configuration",
                    e,
                )
            })?;
            sessions.push(Mutex::new(session));
        }

        let (discovered_input, output_name) = {
            let first = sessions[0].lock().map_err(|_| {
                ClassifierError::config_error("session lock poisoned during model load")
            })?;
            let input = first.inputs.first().map(|i| i.name.clone());
            let output = first.outputs.first().map(|o| o.name.clone());
            (input, output)
        };

        let input_name = match (input_name, discovered_input) {
            (Some(name), _) => name.to_string(),
            (None, Some(name)) => name,
            (None, None) => {
                return Err(ClassifierError::config_error(format!(
                    "model '{}' declares no inputs",
                    path.display()
                )));
            }
        };
        let output_name = output_name.ok_or_else(|| {
            ClassifierError::config_error(format!(
                "model '{}' declares no outputs",
                path.display()
            ))
        })?;

        let model_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown_model")
            .to_string();

        tracing::info!(
            model = %model_name,
            sessions = pool_size,
            input = %input_name,
            output = %output_name,
            "loaded ONNX classifier"
        );

        Ok(OrtInfer {
            sessions,
            next_idx: std::sync::atomic::AtomicUsize::new(0),
            input_name,
            output_name,
            model_path: path.to_path_buf(),
            model_name,
        })
    }

    fn apply_ort_config(
        mut builder: SessionBuilder,
        cfg: &OrtSessionConfig,
    ) -> Result<SessionBuilder, ort::Error> {
        builder = builder.with_log_level(LogLevel::Error)?;
        if let Some(intra) = cfg.intra_threads {
            builder = builder.with_intra_threads(intra)?;
        }
        if let Some(inter) = cfg.inter_threads {
            builder = builder.with_inter_threads(inter)?;
        }
        if let Some(level) = cfg.optimization_level {
            let mapped = match level {
                OrtGraphOptimizationLevel::DisableAll => GraphOptimizationLevel::Disable,
                OrtGraphOptimizationLevel::Level1 => GraphOptimizationLevel::Level1,
                OrtGraphOptimizationLevel::Level2 => GraphOptimizationLevel::Level2,
                OrtGraphOptimizationLevel::Level3 => GraphOptimizationLevel::Level3,
            };
            builder = builder.with_optimization_level(mapped)?;
        }
        let providers = Self::build_execution_providers(&cfg.get_execution_providers());
        if !providers.is_empty() {
            builder = builder.with_execution_providers(providers)?;
        }
        Ok(builder)
    }

    /// Builds execution providers from configuration
    pub(super) fn build_execution_providers(eps: &[OrtExecutionProvider]) -> Vec<ExecutionProviderDispatch> {
        let mut providers = Vec::new();

        for ep in eps {
            match ep {
                OrtExecutionProvider::CPU => {
                    providers
                        .push(ort::execution_providers::CPUExecutionProvider::default().build());
                }
                #[cfg(feature = "cuda")]
                OrtExecutionProvider::CUDA { device_id } => {
                    let mut cuda_provider =
                        ort::execution_providers::CUDAExecutionProvider::default();
                    if let Some(id) = device_id {
                        cuda_provider = cuda_provider.with_device_id(*id);
                    }
                    providers.push(cuda_provider.build());
                }
                #[cfg(not(feature = "cuda"))]
                OrtExecutionProvider::CUDA { .. } => {
                    tracing::warn!("CUDA execution provider requested but the `cuda` feature is disabled; skipping");
                }
            }
        }

        providers
    }
}
