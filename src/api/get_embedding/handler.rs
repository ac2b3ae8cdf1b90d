// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! POST /get-embedding handler

use axum::{extract::State, Json};
use axum_extra::extract::multipart::{Multipart, MultipartRejection};
use tracing::{debug, info, warn};

use super::response::EmbeddingResponse;
use super::upload::{read_upload, UploadedFile};
use crate::api::{AppState, PipelineError};
use crate::embeddings::{embed_document_text, TextEmbedder};
use crate::extraction::{self, DocumentFormat};

/// POST /get-embedding - Embed the text of an uploaded document
///
/// # Request
/// Multipart form with a `file` part whose filename ends in `.pdf` or
/// `.docx` (case-insensitive).
///
/// # Errors
/// - 400: no file, unsupported file type, or no text in the document
/// - 500: text extraction or embedding failed (message included)
pub async fn get_embedding_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<EmbeddingResponse>, PipelineError> {
    let upload = read_upload(multipart).await?;
    let response = run_pipeline(state.embedder.as_ref(), upload).await?;
    Ok(Json(response))
}

/// Dispatch, extract and embed one uploaded document.
pub async fn run_pipeline(
    embedder: &dyn TextEmbedder,
    upload: UploadedFile,
) -> Result<EmbeddingResponse, PipelineError> {
    let format = DocumentFormat::from_filename(&upload.filename);
    if !format.is_supported() {
        debug!("Rejecting {:?}: unsupported file type", upload.filename);
        return Err(PipelineError::UnsupportedFormat);
    }

    // Parsing is CPU-bound; keep it off the async workers
    let bytes = upload.bytes;
    let text = tokio::task::spawn_blocking(move || extraction::extract_text(format, &bytes))
        .await
        .map_err(|e| extraction_task_failed(format, &upload.filename, e))?
        .map_err(|e| {
            warn!("{} extraction failed for {:?}: {}", format, upload.filename, e);
            PipelineError::from(e)
        })?;

    debug!(
        "Extracted {} characters from {:?} ({})",
        text.chars().count(),
        upload.filename,
        format
    );

    if text.is_empty() {
        return Err(PipelineError::NoText);
    }

    let embeddings = embed_document_text(embedder, &text)
        .await
        .map_err(|e| PipelineError::Embedding(format!("{:#}", e)))?;

    let response = EmbeddingResponse::new(embeddings);
    info!(
        "Embedded {:?} with {} ({} dimensions)",
        upload.filename,
        embedder.model_name(),
        response.dimension()
    );
    Ok(response)
}

fn extraction_task_failed(
    format: DocumentFormat,
    filename: &str,
    err: tokio::task::JoinError,
) -> PipelineError {
    warn!("{} extraction task failed for {:?}: {}", format, filename, err);
    PipelineError::Extraction(err.to_string())
}
