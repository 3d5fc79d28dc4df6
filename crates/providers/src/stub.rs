//! Deterministic in-process providers.
//!
//! These back tests and offline runs: selected explicitly, no network,
//! reproducible output for identical input. The `Failing*` variants force
//! every degraded path in the pipeline.

use crate::chat::{ChatMessage, ChatModel};
use crate::embedding::EmbeddingProvider;
use crate::error::{ProviderError, Result};
use crate::rerank::RerankProvider;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Chat model that replays scripted responses, then a fixed default
pub struct StubChat {
    scripted: Mutex<VecDeque<String>>,
    default_response: String,
    calls: AtomicUsize,
}

impl StubChat {
    /// Always answer with the same text
    pub fn always(response: impl Into<String>) -> Self {
        Self {
            scripted: Mutex::new(VecDeque::new()),
            default_response: response.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Answer with each scripted response in order, then the default
    pub fn scripted(
        responses: impl IntoIterator<Item = String>,
        default_response: impl Into<String>,
    ) -> Self {
        Self {
            scripted: Mutex::new(responses.into_iter().collect()),
            default_response: default_response.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of completions issued so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatModel for StubChat {
    async fn complete(&self, _messages: &[ChatMessage], _max_tokens: u32) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .scripted
            .lock()
            .map_err(|_| ProviderError::Other("stub chat poisoned".to_string()))?
            .pop_front();
        Ok(next.unwrap_or_else(|| self.default_response.clone()))
    }
}

/// Chat model whose every call fails
pub struct FailingChat;

#[async_trait]
impl ChatModel for FailingChat {
    async fn complete(&self, _messages: &[ChatMessage], _max_tokens: u32) -> Result<String> {
        Err(ProviderError::Other("chat backend unavailable".to_string()))
    }
}

/// Deterministic embedding provider: a fixed-dimension byte histogram,
/// normalized, so identical text always maps to the identical vector and
/// lexically similar texts land near each other.
pub struct StubEmbedding {
    dimension: usize,
}

impl StubEmbedding {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        for (position, byte) in text.bytes().enumerate() {
            vector[(byte as usize + position) % self.dimension] += 1.0;
        }
        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }
}

impl Default for StubEmbedding {
    fn default() -> Self {
        Self::new(32)
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbedding {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_one(text)).collect())
    }
}

/// Embedding provider whose every call fails
pub struct FailingEmbedding;

#[async_trait]
impl EmbeddingProvider for FailingEmbedding {
    async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(ProviderError::Other(
            "embedding backend unavailable".to_string(),
        ))
    }
}

/// Reranker that scores by query-token overlap
pub struct StubRerank;

#[async_trait]
impl RerankProvider for StubRerank {
    async fn rerank(&self, query: &str, documents: &[String]) -> Result<Vec<f32>> {
        let query_tokens: Vec<String> = query
            .to_ascii_lowercase()
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|t| t.len() >= 3)
            .map(str::to_string)
            .collect();

        Ok(documents
            .iter()
            .map(|doc| {
                let doc = doc.to_ascii_lowercase();
                query_tokens
                    .iter()
                    .filter(|token| doc.contains(token.as_str()))
                    .count() as f32
            })
            .collect())
    }
}

/// Reranker whose every call fails
pub struct FailingRerank;

#[async_trait]
impl RerankProvider for FailingRerank {
    async fn rerank(&self, _query: &str, _documents: &[String]) -> Result<Vec<f32>> {
        Err(ProviderError::Other(
            "rerank backend unavailable".to_string(),
        ))
    }
}
