// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use doc_embed_service::{
    api::{start_server, ApiConfig, AppState},
    embeddings::OnnxEmbeddingModel,
    ServiceConfig,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServiceConfig::load();

    // Default to info when RUST_LOG is unset
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting doc-embed-service v{}", env!("CARGO_PKG_VERSION"));

    let source = config.model_source()?;
    info!("Loading embedding model {}", source.model_name());
    let model = OnnxEmbeddingModel::from_source(&source, config.max_seq_length)
        .await
        .context("Failed to load embedding model")?;
    info!(
        "Embedding model ready: {} ({} dimensions)",
        model.model_name(),
        model.dimension()
    );

    let api_config = ApiConfig {
        listen_addr: config.listen_addr()?,
        max_body_bytes: config.max_body_bytes,
    };

    start_server(api_config, AppState::new(Arc::new(model))).await
}
