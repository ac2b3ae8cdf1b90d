// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Sentence embeddings for extracted document text
//!
//! The request pipeline only sees the [`TextEmbedder`] trait. The production
//! implementation is [`OnnxEmbeddingModel`] running all-MiniLM-L6-v2 on ONNX
//! Runtime; it is loaded once at startup and shared by every request.

pub mod model_source;
pub mod onnx_model;

pub use model_source::{ModelFiles, ModelSource};
pub use onnx_model::OnnxEmbeddingModel;

use anyhow::Result;
use async_trait::async_trait;

/// A loaded sentence-embedding model
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Encodes each text into one fixed-length vector, preserving order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Output dimensionality of every vector
    fn dimension(&self) -> usize;

    /// Short model name (e.g. "all-MiniLM-L6-v2")
    fn model_name(&self) -> &str;
}

/// Embeds a document's text as a single-element batch.
///
/// Returns the batch as produced by the model: exactly one vector of
/// `embedder.dimension()` floats. Truncation of long inputs is left to the
/// model.
pub async fn embed_document_text(
    embedder: &dyn TextEmbedder,
    text: &str,
) -> Result<Vec<Vec<f32>>> {
    anyhow::ensure!(!text.is_empty(), "cannot embed empty text");

    let batch = vec![text.to_string()];
    let embeddings = embedder.embed_batch(&batch).await?;

    anyhow::ensure!(
        embeddings.len() == 1,
        "model returned {} vectors for a single input",
        embeddings.len()
    );
    anyhow::ensure!(
        embeddings[0].len() == embedder.dimension(),
        "model returned a {}-dimensional vector (expected {})",
        embeddings[0].len(),
        embedder.dimension()
    );

    Ok(embeddings)
}
