use thiserror::Error;

/// Result type for provider calls
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Errors surfaced by external model services.
///
/// Callers are expected to absorb these at the node boundary and degrade;
/// nothing here is fatal to a session.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Transport-level failure, including timeouts
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered but the payload did not have the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The selected backend is missing an endpoint or credential
    #[error("Provider not configured: {0}")]
    Unconfigured(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl ProviderError {
    /// Create a malformed-response error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Create an unconfigured-provider error
    pub fn unconfigured(msg: impl Into<String>) -> Self {
        Self::Unconfigured(msg.into())
    }
}
