use serde::{Deserialize, Serialize};
use std::env;

/// Class of generation backend serving a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Self-hosted OpenAI-compatible inference endpoint (no credential)
    LocalInference,
    /// Hosted API requiring a credential
    HostedApi,
}

impl ProviderKind {
    /// Get human-readable name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LocalInference => "local_inference",
            Self::HostedApi => "hosted_api",
        }
    }
}

/// Immutable configuration identifying which generation backend serves a
/// session. Chosen once per session and injected into the nodes that need
/// a completion capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSelection {
    /// Registry identifier
    pub id: String,

    /// Display label, used in answer metadata
    pub display_name: String,

    /// Backend class
    pub provider: ProviderKind,

    /// Base URL of the OpenAI-compatible API
    pub endpoint: String,

    /// Credential for hosted backends
    pub api_key: Option<String>,

    /// Underlying model identifier sent on each request
    pub model_id: String,
}

impl ModelSelection {
    /// A backend is usable when its class-specific requirement is met:
    /// local inference needs an endpoint, hosted APIs need a credential.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        match self.provider {
            ProviderKind::LocalInference => !self.endpoint.is_empty(),
            ProviderKind::HostedApi => {
                !self.endpoint.is_empty()
                    && self.api_key.as_deref().is_some_and(|key| !key.is_empty())
            }
        }
    }
}

/// Registry of known generation backends
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: Vec<ModelSelection>,
}

impl ModelRegistry {
    /// Create a registry from explicit entries
    pub fn new(models: Vec<ModelSelection>) -> Self {
        Self { models }
    }

    /// Built-in entries with endpoints and credentials resolved from the
    /// process environment
    pub fn from_env() -> Self {
        let models = vec![
            ModelSelection {
                id: "local-small".to_string(),
                display_name: "Local 3B (fast)".to_string(),
                provider: ProviderKind::LocalInference,
                endpoint: env::var("LOGSCOUT_LOCAL_ENDPOINT").unwrap_or_default(),
                api_key: None,
                model_id: env::var("LOGSCOUT_LOCAL_MODEL")
                    .unwrap_or_else(|_| "llama-3.2-3b-instruct".to_string()),
            },
            ModelSelection {
                id: "local-large".to_string(),
                display_name: "Local 32B (thorough)".to_string(),
                provider: ProviderKind::LocalInference,
                endpoint: env::var("LOGSCOUT_LOCAL_LARGE_ENDPOINT").unwrap_or_default(),
                api_key: None,
                model_id: env::var("LOGSCOUT_LOCAL_LARGE_MODEL")
                    .unwrap_or_else(|_| "qwen2.5-32b-instruct".to_string()),
            },
            ModelSelection {
                id: "hosted-default".to_string(),
                display_name: "Hosted API".to_string(),
                provider: ProviderKind::HostedApi,
                endpoint: env::var("LOGSCOUT_HOSTED_ENDPOINT")
                    .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
                api_key: env::var("LOGSCOUT_API_KEY").ok(),
                model_id: env::var("LOGSCOUT_HOSTED_MODEL")
                    .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            },
        ];
        Self { models }
    }

    /// All registered entries, configured or not
    pub fn all(&self) -> &[ModelSelection] {
        &self.models
    }

    /// Only entries whose backend requirements are satisfied
    pub fn available(&self) -> Vec<&ModelSelection> {
        self.models.iter().filter(|m| m.is_configured()).collect()
    }

    /// Look up a specific entry by registry id
    pub fn get(&self, id: &str) -> Option<&ModelSelection> {
        self.models.iter().find(|m| m.id == id)
    }
}
