// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX Embedding Model Wrapper
//!
//! This module provides a wrapper around ONNX Runtime for running
//! the all-MiniLM-L6-v2 sentence transformer model.
//!
//! Features:
//! - ONNX model loading from disk
//! - BERT tokenization with truncation to the model's max sequence length
//! - Batch embedding generation with per-batch padding
//! - Attention-masked mean pooling over token embeddings
//! - L2 normalization, matching the sentence-transformers pipeline

use anyhow::{Context, Result};
use async_trait::async_trait;
use ndarray::{Array2, ArrayView2, Axis, Ix2};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

use super::{ModelSource, TextEmbedder};

/// ONNX-based embedding model (all-MiniLM-L6-v2)
///
/// # Model Details
/// - Input: Text strings, truncated to `max_length` tokens
/// - Output: 384-dimensional, unit-length f32 vectors
/// - Provider: CPU (ONNX Runtime)
///
/// # Thread Safety
/// Inference needs exclusive access to the session, so it sits behind a
/// mutex. Clones share the same session and tokenizer.
#[derive(Clone)]
pub struct OnnxEmbeddingModel {
    /// ONNX Runtime session
    session: Arc<Mutex<Session>>,

    /// BERT tokenizer
    tokenizer: Arc<Tokenizer>,

    /// Model name (e.g., "all-MiniLM-L6-v2")
    model_name: String,

    /// Output dimension (384 for all-MiniLM-L6-v2)
    dimension: usize,

    /// Maximum sequence length (256 for all-MiniLM-L6-v2)
    max_length: usize,
}

impl std::fmt::Debug for OnnxEmbeddingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEmbeddingModel")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .field("max_length", &self.max_length)
            .finish_non_exhaustive()
    }
}

impl OnnxEmbeddingModel {
    /// Creates a new ONNX embedding model from disk paths
    ///
    /// # Errors
    /// Returns error if:
    /// - Model file not found or invalid
    /// - Tokenizer file not found or invalid
    /// - ONNX Runtime initialization fails
    /// - A probe inference does not produce `[batch, seq_len, hidden]` output
    ///
    /// # Example
    /// ```ignore
    /// let model = OnnxEmbeddingModel::new(
    ///     "all-MiniLM-L6-v2",
    ///     "./models/all-MiniLM-L6-v2/onnx/model.onnx",
    ///     "./models/all-MiniLM-L6-v2/tokenizer.json",
    ///     256,
    /// )?;
    /// ```
    pub fn new<P: AsRef<Path>>(
        model_name: impl Into<String>,
        model_path: P,
        tokenizer_path: P,
        max_length: usize,
    ) -> Result<Self> {
        let model_name = model_name.into();
        let model_path = model_path.as_ref();
        let tokenizer_path = tokenizer_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("ONNX model file not found: {}", model_path.display());
        }
        if !tokenizer_path.exists() {
            anyhow::bail!("Tokenizer file not found: {}", tokenizer_path.display());
        }

        info!("Initializing ONNX embedding model {}", model_name);

        let mut session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))?;

        let mut tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("Failed to configure truncation: {}", e))?;
        tokenizer.with_padding(None);

        // Probe the output shape; outputs are dropped before the session moves
        let dimension = {
            let encoding = tokenizer
                .encode("validation test", true)
                .map_err(|e| anyhow::anyhow!("Tokenizer validation failed: {}", e))?;
            let (input_ids, attention_mask, token_type_ids) =
                batch_tensors(&[encoding.get_ids()], &[encoding.get_attention_mask()])?;

            let outputs = session.run(ort::inputs![
                "input_ids" => Value::from_array(input_ids)?,
                "attention_mask" => Value::from_array(attention_mask)?,
                "token_type_ids" => Value::from_array(token_type_ids)?
            ])?;

            let output_tensor = outputs[0]
                .try_extract_array::<f32>()
                .context("Failed to extract output tensor")?;
            let output_shape = output_tensor.shape();

            // Token-level embeddings: [batch, seq_len, hidden_dim]
            if output_shape.len() != 3 {
                anyhow::bail!(
                    "Model outputs unexpected dimensions: {:?} (expected [batch, seq_len, hidden])",
                    output_shape
                );
            }
            output_shape[2]
        };

        info!(
            "ONNX embedding model {} loaded ({} dimensions, max {} tokens)",
            model_name, dimension, max_length
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            model_name,
            dimension,
            max_length,
        })
    }

    /// Resolves the model files for `source` and loads them
    pub async fn from_source(source: &ModelSource, max_length: usize) -> Result<Self> {
        let files = source.resolve().await?;
        let model_name = source.model_name();

        tokio::task::spawn_blocking(move || {
            Self::new(model_name, files.model_path, files.tokenizer_path, max_length)
        })
        .await
        .context("Model loading task failed")?
    }

    /// Generates embeddings for multiple texts in one inference call
    ///
    /// Tokenizes all texts, pads to the longest sequence, runs the model,
    /// then mean-pools and normalizes each row.
    pub fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let encodings = texts
            .iter()
            .map(|text| {
                self.tokenizer
                    .encode(text.as_str(), true)
                    .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))
            })
            .collect::<Result<Vec<_>>>()?;

        let ids: Vec<&[u32]> = encodings.iter().map(|e| e.get_ids()).collect();
        let masks: Vec<&[u32]> = encodings.iter().map(|e| e.get_attention_mask()).collect();
        let (input_ids, attention_mask, token_type_ids) = batch_tensors(&ids, &masks)?;
        let pooling_mask = attention_mask.clone();

        debug!(
            "Running {} inference on batch of {} ({} tokens max)",
            self.model_name,
            texts.len(),
            input_ids.ncols()
        );

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("ONNX session lock poisoned"))?;
        let outputs = session.run(ort::inputs![
            "input_ids" => Value::from_array(input_ids)?,
            "attention_mask" => Value::from_array(attention_mask)?,
            "token_type_ids" => Value::from_array(token_type_ids)?
        ])?;

        // Use index [0] since different exports name the output differently
        let output_array = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        let mut embeddings = Vec::with_capacity(texts.len());
        for (row, mask) in pooling_mask.outer_iter().enumerate() {
            let token_embeddings = output_array
                .index_axis(Axis(0), row)
                .into_dimensionality::<Ix2>()
                .context("Unexpected token embedding shape")?;
            let mut pooled = mean_pool(token_embeddings, &mask.to_vec());
            l2_normalize(&mut pooled);

            if pooled.len() != self.dimension {
                anyhow::bail!(
                    "Unexpected embedding dimension at index {}: {} (expected {})",
                    row,
                    pooled.len(),
                    self.dimension
                );
            }
            embeddings.push(pooled);
        }

        Ok(embeddings)
    }

    /// Returns the output dimension of this model
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the model name
    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[async_trait]
impl TextEmbedder for OnnxEmbeddingModel {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let model = self.clone();
        let texts = texts.to_vec();
        tokio::task::spawn_blocking(move || model.encode(&texts))
            .await
            .context("Embedding task failed")?
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Builds right-padded `[batch, max_len]` input tensors.
///
/// Token type ids are all zero, as for single-segment inputs.
fn batch_tensors(
    ids: &[&[u32]],
    masks: &[&[u32]],
) -> Result<(Array2<i64>, Array2<i64>, Array2<i64>)> {
    let batch = ids.len();
    let max_len = ids.iter().map(|seq| seq.len()).max().unwrap_or(0);

    let mut input_ids = Array2::<i64>::zeros((batch, max_len));
    let mut attention_mask = Array2::<i64>::zeros((batch, max_len));
    for (row, (seq, mask)) in ids.iter().zip(masks).enumerate() {
        anyhow::ensure!(
            seq.len() == mask.len(),
            "token ids and attention mask differ in length"
        );
        for (col, (&id, &m)) in seq.iter().zip(mask.iter()).enumerate() {
            input_ids[[row, col]] = id as i64;
            attention_mask[[row, col]] = m as i64;
        }
    }
    let token_type_ids = Array2::<i64>::zeros((batch, max_len));

    Ok((input_ids, attention_mask, token_type_ids))
}

/// Averages token embeddings over positions where the attention mask is set.
fn mean_pool(token_embeddings: ArrayView2<f32>, mask: &[i64]) -> Vec<f32> {
    let hidden_dim = token_embeddings.ncols();
    let mut pooled = vec![0.0f32; hidden_dim];
    let mut sum_mask = 0.0f32;

    for (token, &m) in token_embeddings.outer_iter().zip(mask) {
        let weight = m as f32;
        sum_mask += weight;
        for (acc, &value) in pooled.iter_mut().zip(token.iter()) {
            *acc += value * weight;
        }
    }

    for val in &mut pooled {
        *val /= sum_mask.max(1e-9);
    }
    pooled
}

/// Scales a vector to unit length; the zero vector is left unchanged.
fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 1e-12 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}
