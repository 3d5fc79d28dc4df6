use crate::error::{ProviderError, Result};
use crate::models::ModelSelection;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message in a completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Text generation capability.
///
/// Every adapter pins temperature to zero so that grading and query
/// rewriting stay reproducible across retries.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate a completion for the given messages, bounded at
    /// `max_tokens` output tokens.
    async fn complete(&self, messages: &[ChatMessage], max_tokens: u32) -> Result<String>;
}

/// Adapter for OpenAI-compatible `/chat/completions` endpoints.
///
/// Covers both hosted APIs and self-hosted inference servers; the only
/// difference is whether a bearer credential is attached.
pub struct OpenAiCompatChat {
    client: Client,
    endpoint: String,
    model_id: String,
    api_key: Option<String>,
}

impl OpenAiCompatChat {
    /// Create an adapter with an explicit endpoint and model id
    pub fn new(
        endpoint: impl Into<String>,
        model_id: impl Into<String>,
        api_key: Option<String>,
        timeout_ms: u64,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            model_id: model_id.into(),
            api_key,
        })
    }

    /// Create an adapter for a registry selection
    pub fn from_selection(selection: &ModelSelection, timeout_ms: u64) -> Result<Self> {
        if !selection.is_configured() {
            return Err(ProviderError::unconfigured(format!(
                "model '{}' is missing an endpoint or credential",
                selection.id
            )));
        }
        Self::new(
            selection.endpoint.clone(),
            selection.model_id.clone(),
            selection.api_key.clone(),
            timeout_ms,
        )
    }
}

#[async_trait]
impl ChatModel for OpenAiCompatChat {
    async fn complete(&self, messages: &[ChatMessage], max_tokens: u32) -> Result<String> {
        let url = format!("{}/chat/completions", self.endpoint.trim_end_matches('/'));
        let body = serde_json::json!({
            "model": self.model_id,
            "messages": messages,
            "max_tokens": max_tokens,
            "temperature": 0.0,
        });

        let mut request = self.client.post(url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?.error_for_status()?;
        let json: Value = response.json().await?;
        parse_completion_response(&json)
    }
}

fn parse_completion_response(json: &Value) -> Result<String> {
    json.get("choices")
        .and_then(|v| v.as_array())
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .map(str::to_string)
        .ok_or_else(|| ProviderError::malformed("completion response missing choices[0].message.content"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_completion_response() {
        let json = serde_json::json!({
            "choices": [
                { "message": { "role": "assistant", "content": "the pod is crash looping" } }
            ]
        });
        let text = parse_completion_response(&json).unwrap();
        assert_eq!(text, "the pod is crash looping");
    }

    #[test]
    fn test_parse_rejects_empty_choices() {
        let json = serde_json::json!({ "choices": [] });
        assert!(parse_completion_response(&json).is_err());
    }

    #[test]
    fn test_message_serialization_uses_lowercase_roles() {
        let message = ChatMessage::system("be terse");
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["role"], "system");
    }

    #[tokio::test]
    async fn test_complete_posts_to_chat_completions() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"yes"}}]}"#)
            .create_async()
            .await;

        let chat = OpenAiCompatChat::new(
            format!("{}/v1", server.url()),
            "test-model",
            Some("sk-test".to_string()),
            5_000,
        )
        .unwrap();

        let answer = chat
            .complete(&[ChatMessage::user("is this relevant?")], 16)
            .await
            .unwrap();

        assert_eq!(answer, "yes");
        mock.assert_async().await;
    }
}
