// Shared by several test binaries; not every helper is used by each.
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, header},
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use imgcls::core::{ClassifierError, ClassifierResult, InferenceEngine, PersistencePolicy, Tensor2D, Tensor4D};
use imgcls::domain::LabelVocabulary;
use imgcls::models::ClassificationModel;
use imgcls::pipeline::{ClassificationPipeline, RecordingPipeline};
use imgcls::server::{AppState, build_app};
use imgcls::storage::{NewPrediction, PredictionId, PredictionSink};
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const BOUNDARY: &str = "imgcls-test-boundary";
pub const COLOR_LABELS: &str = "red\ngreen\nblue\n";

/// Deterministic stand-in for a real classifier.
///
/// The logits are the mean of each normalized input channel, so the image's
/// dominant color is always the top class. Counts forward passes.
#[derive(Debug, Default)]
pub struct ChannelMeanEngine {
    pub calls: AtomicUsize,
}

impl InferenceEngine for ChannelMeanEngine {
    fn infer(&self, input: &Tensor4D) -> Result<Tensor2D, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let means: Vec<f32> = (0..input.shape()[1])
            .map(|c| {
                let channel = input.index_axis(ndarray::Axis(1), c);
                channel.sum() / channel.len() as f32
            })
            .collect();
        Ok(Tensor2D::from_shape_vec((1, means.len()), means)?)
    }

    fn engine_info(&self) -> String {
        "channel-mean-mock".to_string()
    }
}

/// Sink that always fails, standing in for an unreachable database.
#[derive(Debug, Default)]
pub struct FailingSink {
    pub attempts: AtomicUsize,
}

#[async_trait]
impl PredictionSink for FailingSink {
    async fn record(&self, _prediction: NewPrediction) -> ClassifierResult<PredictionId> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(ClassifierError::storage(
            "insert prediction",
            std::io::Error::other("connection refused"),
        ))
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}

pub fn color_pipeline(labels: &str) -> Arc<ClassificationPipeline<ChannelMeanEngine>> {
    Arc::new(ClassificationPipeline::new(
        ClassificationModel::new(ChannelMeanEngine::default()),
        LabelVocabulary::from_text(labels).unwrap(),
    ))
}

pub fn recording(
    labels: &str,
    sink: Option<Arc<dyn PredictionSink>>,
    policy: PersistencePolicy,
) -> RecordingPipeline<ChannelMeanEngine> {
    RecordingPipeline::new(color_pipeline(labels), sink, policy)
}

pub fn test_app(
    labels: &str,
    sink: Option<Arc<dyn PredictionSink>>,
    policy: PersistencePolicy,
    max_upload_bytes: usize,
) -> Router {
    build_app(
        AppState::new(recording(labels, sink, policy)),
        max_upload_bytes,
    )
}

pub fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format).unwrap();
    buf
}

/// A `width x height` single-color PNG.
pub fn solid_png(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    encode(
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color))),
        ImageFormat::Png,
    )
}

/// Builds a multipart body with one part; `filename: None` makes it a plain field.
pub fn multipart_body(field: &str, filename: Option<&str>, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    match filename {
        Some(name) => body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{name}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        ),
        None => body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{field}\"\r\n\r\n").as_bytes(),
        ),
    }
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn predict_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}
