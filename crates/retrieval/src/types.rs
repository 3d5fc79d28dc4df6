use logscout_log_chunker::LogChunk;
use serde::{Deserialize, Serialize};

/// Which retrieval signal produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalMethod {
    /// Ranked only by the term-frequency index
    Lexical,
    /// Ranked only by the embedding index
    Dense,
    /// Present in both rankings
    Fused,
}

impl RetrievalMethod {
    /// Get human-readable name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lexical => "lexical",
            Self::Dense => "dense",
            Self::Fused => "fused",
        }
    }
}

/// A candidate chunk with its rank-derived fusion score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredChunk {
    pub chunk: LogChunk,
    pub fusion_score: f32,
    pub method: RetrievalMethod,
}

/// A candidate that survived reranking, with its relative rank movement
/// versus the fused input order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedChunk {
    pub chunk: LogChunk,
    pub fusion_score: f32,
    pub rerank_score: f32,
    /// 1-based position in the fused candidate list
    pub original_rank: usize,
    /// 1-based position after reranking
    pub new_rank: usize,
}

impl RankedChunk {
    /// Positive when reranking promoted the chunk
    #[must_use]
    pub const fn rank_delta(&self) -> isize {
        self.original_rank as isize - self.new_rank as isize
    }
}
