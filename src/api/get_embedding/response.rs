// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};

/// Success body for POST /get-embedding
///
/// `embeddings` mirrors the single-item batch sent to the model, so it always
/// holds exactly one vector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingResponse {
    pub embeddings: Vec<Vec<f32>>,
}

impl EmbeddingResponse {
    pub fn new(embeddings: Vec<Vec<f32>>) -> Self {
        Self { embeddings }
    }

    /// Length of the returned vector (0 if there is none)
    pub fn dimension(&self) -> usize {
        self.embeddings.first().map(Vec::len).unwrap_or(0)
    }
}
