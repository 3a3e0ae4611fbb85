//! HTTP boundary.
//!
//! Routes:
//! - `POST /predict` multipart upload under the `file` field, answered with
//!   `{"predicted_class": ..., "confidence_score": ...}`
//! - `GET /health`

pub mod error;
pub mod handlers;

pub use error::ApiError;

use crate::core::{
    ClassifierError, ClassifierResult, InferenceEngine, OrtInfer, ServiceConfig,
};
use crate::domain::LabelVocabulary;
use crate::models::ClassificationModelBuilder;
use crate::pipeline::{ClassificationPipeline, RecordingPipeline};
use crate::storage;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// State shared by every request handler.
#[derive(Debug)]
pub struct AppState<E: InferenceEngine = OrtInfer> {
    pub pipeline: RecordingPipeline<E>,
}

impl<E: InferenceEngine> Clone for AppState<E> {
    fn clone(&self) -> Self {
        Self {
            pipeline: self.pipeline.clone(),
        }
    }
}

impl<E: InferenceEngine> AppState<E> {
    pub fn new(pipeline: RecordingPipeline<E>) -> Self {
        Self { pipeline }
    }
}

/// Builds the router with request tracing and the upload size limit applied.
pub fn build_app<E: InferenceEngine + 'static>(
    state: AppState<E>,
    max_upload_bytes: usize,
) -> Router {
    Router::new()
        .route("/predict", post(handlers::predict::<E>))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Loads the vocabulary, the model and the prediction sink described by
/// `config`. Everything is loaded exactly once, before the first request.
pub async fn load_pipeline(config: &ServiceConfig) -> ClassifierResult<RecordingPipeline> {
    let vocabulary = LabelVocabulary::load(&config.labels).await?;

    let mut builder =
        ClassificationModelBuilder::new().session_pool_size(config.session_pool_size);
    if let Some(name) = &config.model_input_name {
        builder = builder.input_name(name.clone());
    }
    if let Some(ort) = &config.ort_session {
        builder = builder.with_ort_config(ort.clone());
    }
    let model_path = config.model_path.clone();
    let model = tokio::task::spawn_blocking(move || builder.build(&model_path))
        .await
        .map_err(|e| {
            ClassifierError::model_load_error(&config.model_path, "model loading task failed", e)
        })??;

    tracing::info!(
        engine = %model.engine_info(),
        labels = vocabulary.len(),
        "classifier ready"
    );

    let sink = storage::connect(&config.storage).await?;
    let pipeline = Arc::new(ClassificationPipeline::new(model, vocabulary));
    Ok(RecordingPipeline::new(
        pipeline,
        sink,
        config.persistence_policy,
    ))
}

/// Serves `app` on `address` until Ctrl-C or SIGTERM.
pub async fn serve(app: Router, address: &str) -> ClassifierResult<()> {
    let listener = tokio::net::TcpListener::bind(address).await?;
    tracing::info!(address = %listener.local_addr()?, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, starting graceful shutdown"),
        _ = terminate => tracing::info!("received terminate signal, starting graceful shutdown"),
    }
}
