//! # Logscout Hybrid Index
//!
//! Two complementary in-memory indexes over one question's evidence
//! chunks: a lexical BM25 term-frequency index (no external dependency)
//! and a dense cosine-similarity index fed by an external embedding
//! service.
//!
//! Both are ephemeral: built from nothing for each question, discarded at
//! session end, never persisted (rebuild-per-query is the design, not an
//! optimization gap). Embedding failure degrades retrieval to
//! lexical-only rather than failing the build.

mod builder;
mod dense;
mod error;
mod lexical;

pub use builder::HybridIndex;
pub use dense::{cosine_similarity, DenseIndex};
pub use error::{IndexError, Result};
pub use lexical::LexicalIndex;
