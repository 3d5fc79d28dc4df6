//! # Logscout Providers
//!
//! Capability interfaces for the external model services the pipeline
//! consumes (text completion, dense embeddings, cross-encoder reranking),
//! plus concrete HTTP adapters and the generation-backend registry.
//!
//! The pipeline core depends only on the traits; adapters are selected by
//! static configuration at session start. Every adapter issues requests
//! with a finite timeout and pins sampling temperature to zero, so a
//! timeout or transport failure is an ordinary `ProviderError` the calling
//! node absorbs into its documented fallback.

mod chat;
mod embedding;
mod error;
mod models;
mod rerank;
pub mod stub;

pub use chat::{ChatMessage, ChatModel, OpenAiCompatChat, Role};
pub use embedding::{EmbeddingProvider, HttpEmbeddingProvider};
pub use error::{ProviderError, Result};
pub use models::{ModelRegistry, ModelSelection, ProviderKind};
pub use rerank::{HttpRerankProvider, RerankProvider};
