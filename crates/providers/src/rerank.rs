use crate::error::{ProviderError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Cross-encoder relevance scoring capability
#[async_trait]
pub trait RerankProvider: Send + Sync {
    /// Score each document against the query; output is aligned to the
    /// input document order, one score per document.
    async fn rerank(&self, query: &str, documents: &[String]) -> Result<Vec<f32>>;
}

/// Adapter for reranker services exposing a `/rerank` endpoint that
/// returns `{index, score}` pairs
pub struct HttpRerankProvider {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpRerankProvider {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout_ms: u64,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        })
    }
}

#[async_trait]
impl RerankProvider for HttpRerankProvider {
    async fn rerank(&self, query: &str, documents: &[String]) -> Result<Vec<f32>> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/rerank", self.endpoint.trim_end_matches('/'));
        let body = serde_json::json!({
            "query": query,
            "texts": documents,
        });

        let mut request = self.client.post(url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?.error_for_status()?;
        let json: Value = response.json().await?;
        parse_rerank_response(&json, documents.len())
    }
}

/// Responses arrive sorted by score; realign them to input order so the
/// caller can zip scores with its own document list. Documents the service
/// did not mention score zero.
fn parse_rerank_response(json: &Value, doc_count: usize) -> Result<Vec<f32>> {
    let results = json
        .get("results")
        .or_else(|| json.as_array().map(|_| json))
        .and_then(|v| v.as_array())
        .ok_or_else(|| ProviderError::malformed("rerank response missing results array"))?;

    let mut scores = vec![0.0f32; doc_count];
    for item in results {
        let index = item
            .get("index")
            .and_then(|v| v.as_u64())
            .map(|v| v as usize)
            .ok_or_else(|| ProviderError::malformed("rerank item missing index"))?;
        let score = item
            .get("relevance_score")
            .or_else(|| item.get("score"))
            .and_then(|v| v.as_f64())
            .ok_or_else(|| ProviderError::malformed("rerank item missing score"))?;

        if index >= doc_count {
            return Err(ProviderError::malformed(format!(
                "rerank index {index} out of range for {doc_count} documents"
            )));
        }
        scores[index] = score as f32;
    }

    Ok(scores)
}
