//! # Logscout Retrieval
//!
//! The rank-fusion retriever and relevance reranker at the heart of the
//! troubleshooting pipeline.
//!
//! One question flows through:
//! 1. Query augmentation: scope identifiers and detected symptom/resource
//!    keywords are appended to the raw question
//! 2. Hybrid search: the augmented query runs against both ephemeral
//!    indexes (lexical term-frequency + dense embeddings)
//! 3. Reciprocal-rank fusion: both rankings merge into one candidate list
//! 4. Reranking: a cross-encoder service refines the order, falling back
//!    to fusion-score order when unavailable
//!
//! Retrieval never raises into its caller; failures degrade to empty or
//! shortened candidate lists.

mod augment;
mod error;
mod fusion;
mod rerank;
mod retriever;
mod types;

pub use augment::{QueryAugmenter, QueryContext};
pub use error::{Result, RetrievalError};
pub use fusion::{rrf_fuse, FusedHit, RRF_K};
pub use rerank::{Reranker, FALLBACK_TOP_K};
pub use retriever::{HybridRetriever, MIN_EVIDENCE_CHARS};
pub use types::{RankedChunk, RetrievalMethod, ScoredChunk};
