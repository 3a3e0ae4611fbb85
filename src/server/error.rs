use crate::core::{ClassifierError, ErrorKind};
use axum::{
    Json,
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Failure of a request at the HTTP boundary.
///
/// Only the fixed public message is sent to the client. Internal details are
/// logged when the response is built.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no file part in the request")]
    MissingFile,

    #[error("no file selected")]
    EmptyFilename,

    #[error("invalid multipart request: {0}")]
    Multipart(#[from] MultipartError),

    #[error("invalid multipart request: {0}")]
    MultipartRejection(#[from] MultipartRejection),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingFile | Self::EmptyFilename => StatusCode::BAD_REQUEST,
            Self::Multipart(e) => e.status(),
            Self::MultipartRejection(e) => e.status(),
            Self::Classifier(e) => match e.kind() {
                ErrorKind::Decode => StatusCode::BAD_REQUEST,
                ErrorKind::Inference
                | ErrorKind::VocabularyMismatch
                | ErrorKind::Config
                | ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Message returned in the `error` field of the response body.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::MissingFile => "no file part in the request",
            Self::EmptyFilename => "no file selected",
            Self::Multipart(_) | Self::MultipartRejection(_) => "invalid multipart request",
            Self::Classifier(e) => match e.kind() {
                ErrorKind::Decode => "could not decode the uploaded image",
                ErrorKind::Storage => "failed to record prediction",
                ErrorKind::Inference | ErrorKind::VocabularyMismatch | ErrorKind::Config => {
                    "classification failed"
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }
        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}
