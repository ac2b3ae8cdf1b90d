// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod embeddings;
pub mod extraction;

pub use api::{create_router, ApiConfig, AppState, PipelineError};
pub use config::ServiceConfig;
pub use embeddings::{OnnxEmbeddingModel, TextEmbedder};
pub use extraction::{DocumentFormat, ExtractionError};
