use thiserror::Error;

pub type Result<T> = std::result::Result<T, RetrievalError>;

/// Internal retrieval failures. These never cross the retriever's public
/// boundary (`HybridRetriever::retrieve` absorbs them into an empty
/// candidate list), but the typed chain keeps the fallback sites honest.
#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Index error: {0}")]
    Index(#[from] logscout_hybrid_index::IndexError),

    #[error("Provider error: {0}")]
    Provider(#[from] logscout_providers::ProviderError),

    #[error("{0}")]
    Other(String),
}
