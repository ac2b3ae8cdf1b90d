// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod get_embedding;
pub mod health;
pub mod server;

pub use errors::{ErrorResponse, PipelineError};
pub use get_embedding::{get_embedding_handler, EmbeddingResponse, UploadedFile};
pub use health::{health_handler, HealthResponse};
pub use server::{create_router, start_server, ApiConfig, AppState};
