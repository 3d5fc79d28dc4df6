use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexError>;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Embedding error: {0}")]
    EmbeddingError(#[from] logscout_providers::ProviderError),

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Vector count {vectors} does not match chunk count {chunks}")]
    VectorCountMismatch { vectors: usize, chunks: usize },

    #[error("{0}")]
    Other(String),
}
