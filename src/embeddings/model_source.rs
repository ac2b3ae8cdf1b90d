// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Where the embedding model's files come from

use anyhow::{Context, Result};
use hf_hub::api::tokio::Api;
use std::path::PathBuf;
use tracing::info;

/// ONNX export inside a sentence-transformers model repository
pub const HUB_MODEL_FILE: &str = "onnx/model.onnx";
pub const HUB_TOKENIZER_FILE: &str = "tokenizer.json";

/// Model location chosen at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// Files downloaded (and cached) from a Hugging Face model repository
    Hub { repo_id: String },
    /// Files already on disk
    Local {
        model_path: PathBuf,
        tokenizer_path: PathBuf,
    },
}

/// Resolved on-disk paths for a model
#[derive(Debug, Clone)]
pub struct ModelFiles {
    pub model_path: PathBuf,
    pub tokenizer_path: PathBuf,
}

impl ModelSource {
    /// Short display name: the last path segment of the repository id, or the
    /// model file's parent directory for local files.
    pub fn model_name(&self) -> String {
        match self {
            ModelSource::Hub { repo_id } => repo_id
                .rsplit('/')
                .next()
                .unwrap_or(repo_id.as_str())
                .to_string(),
            ModelSource::Local { model_path, .. } => model_path
                .parent()
                .and_then(|dir| dir.file_name())
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "local-model".to_string()),
        }
    }

    /// Returns local paths for the model, downloading them first if needed.
    pub async fn resolve(&self) -> Result<ModelFiles> {
        match self {
            ModelSource::Local {
                model_path,
                tokenizer_path,
            } => Ok(ModelFiles {
                model_path: model_path.clone(),
                tokenizer_path: tokenizer_path.clone(),
            }),
            ModelSource::Hub { repo_id } => {
                info!("Fetching embedding model {} from the Hugging Face hub", repo_id);
                let api = Api::new().context("Failed to create Hugging Face hub client")?;
                let repo = api.model(repo_id.clone());

                let model_path = repo
                    .get(HUB_MODEL_FILE)
                    .await
                    .with_context(|| format!("Failed to fetch {} from {}", HUB_MODEL_FILE, repo_id))?;
                let tokenizer_path = repo.get(HUB_TOKENIZER_FILE).await.with_context(|| {
                    format!("Failed to fetch {} from {}", HUB_TOKENIZER_FILE, repo_id)
                })?;

                info!("Model files cached at {}", model_path.display());
                Ok(ModelFiles {
                    model_path,
                    tokenizer_path,
                })
            }
        }
    }
}
