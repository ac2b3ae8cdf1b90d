// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::extraction::ExtractionError;

/// JSON body of every failed request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

/// Terminal failure of one `/get-embedding` request.
///
/// The `Display` text is the exact message returned to the client; the
/// extraction and embedding variants carry the underlying error text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("No file provided")]
    MissingFile,

    #[error("Unsupported file type")]
    UnsupportedFormat,

    #[error("Error extracting text: {0}")]
    Extraction(String),

    #[error("No text extracted from file")]
    NoText,

    #[error("Error calculating embeddings: {0}")]
    Embedding(String),
}

impl PipelineError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PipelineError::MissingFile
            | PipelineError::UnsupportedFormat
            | PipelineError::NoText => StatusCode::BAD_REQUEST,
            PipelineError::Extraction(_) | PipelineError::Embedding(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
        }
    }
}

impl From<ExtractionError> for PipelineError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::UnsupportedFormat => PipelineError::UnsupportedFormat,
            other => PipelineError::Extraction(other.to_string()),
        }
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            warn!("Request failed: {}", self);
        }
        (status, Json(self.to_response())).into_response()
    }
}
