// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Request intake: pulls the uploaded document out of a multipart body

use axum::body::Bytes;
use axum_extra::extract::multipart::{Multipart, MultipartRejection};
use tracing::{debug, warn};

use crate::api::PipelineError;

/// Multipart part name that carries the document
pub const FILE_FIELD: &str = "file";

/// Document bytes and the filename the client declared
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Bytes,
}

/// Finds the first `file` part that carries a filename.
///
/// A body that is not multipart, that cannot be parsed, or that has no such
/// part, is treated as a request without a file. Parts named `file` without
/// a filename are plain form values and are skipped.
pub async fn read_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<UploadedFile, PipelineError> {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            debug!("Request is not multipart: {}", rejection);
            return Err(PipelineError::MissingFile);
        }
    };

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!("Unreadable multipart body: {}", e);
        PipelineError::MissingFile
    })? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        let bytes = field.bytes().await.map_err(|e| {
            warn!("Upload {:?} was cut short: {}", filename, e);
            PipelineError::MissingFile
        })?;
        debug!("Received upload {:?} ({} bytes)", filename, bytes.len());

        return Ok(UploadedFile { filename, bytes });
    }

    Err(PipelineError::MissingFile)
}
