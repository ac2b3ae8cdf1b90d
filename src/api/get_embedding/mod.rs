// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /get-embedding
//!
//! Accepts a multipart upload with a `file` part (PDF or DOCX), extracts the
//! document text and returns its sentence embedding:
//!
//! ```json
//! { "embeddings": [[0.01, -0.03, ...]] }
//! ```

pub mod handler;
pub mod response;
pub mod upload;

pub use handler::{get_embedding_handler, run_pipeline};
pub use response::EmbeddingResponse;
pub use upload::{read_upload, UploadedFile, FILE_FIELD};
