// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Service configuration
//!
//! Every setting can be given as a command-line flag or an environment
//! variable (a `.env` file is loaded first). Defaults reproduce a plain
//! local deployment: port 5000 and all-MiniLM-L6-v2 fetched from the hub.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::embeddings::ModelSource;

pub const DEFAULT_MODEL_ID: &str = "sentence-transformers/all-MiniLM-L6-v2";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MAX_SEQ_LENGTH: usize = 256;

/// Document embedding service
#[derive(Parser, Debug, Clone)]
#[command(name = "doc-embed-service")]
#[command(version)]
#[command(about = "Extracts text from uploaded PDF/DOCX files and returns sentence embeddings", long_about = None)]
pub struct ServiceConfig {
    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Hugging Face repository holding the sentence-transformers model
    #[arg(long, env = "EMBEDDING_MODEL_ID", default_value = DEFAULT_MODEL_ID)]
    pub model_id: String,

    /// Local ONNX model file (requires --tokenizer-path)
    #[arg(long, env = "EMBEDDING_MODEL_PATH")]
    pub model_path: Option<PathBuf>,

    /// Local tokenizer.json (requires --model-path)
    #[arg(long, env = "EMBEDDING_TOKENIZER_PATH")]
    pub tokenizer_path: Option<PathBuf>,

    /// Tokens kept per input; longer text is truncated by the tokenizer
    #[arg(long, env = "EMBEDDING_MAX_SEQ_LENGTH", default_value_t = DEFAULT_MAX_SEQ_LENGTH)]
    pub max_seq_length: usize,

    /// Request body limit in bytes; unlimited when unset
    #[arg(long, env = "MAX_BODY_BYTES")]
    pub max_body_bytes: Option<usize>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            model_id: DEFAULT_MODEL_ID.to_string(),
            model_path: None,
            tokenizer_path: None,
            max_seq_length: DEFAULT_MAX_SEQ_LENGTH,
            max_body_bytes: None,
        }
    }
}

impl ServiceConfig {
    /// Loads `.env` (if present) and parses flags and environment
    pub fn load() -> Self {
        dotenv::dotenv().ok();
        Self::parse()
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .with_context(|| format!("Invalid listen host: {}", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn model_source(&self) -> Result<ModelSource> {
        match (&self.model_path, &self.tokenizer_path) {
            (Some(model_path), Some(tokenizer_path)) => Ok(ModelSource::Local {
                model_path: model_path.clone(),
                tokenizer_path: tokenizer_path.clone(),
            }),
            (None, None) => Ok(ModelSource::Hub {
                repo_id: self.model_id.clone(),
            }),
            (Some(_), None) => {
                anyhow::bail!("--model-path given without --tokenizer-path")
            }
            (None, Some(_)) => {
                anyhow::bail!("--tokenizer-path given without --model-path")
            }
        }
    }
}
