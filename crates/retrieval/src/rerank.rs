use crate::types::{RankedChunk, ScoredChunk};
use logscout_providers::RerankProvider;

/// Cap applied when the rerank service is unavailable; shorter than the
/// primary `top_k` so downstream consumers implicitly see the reduced
/// confidence through list length
pub const FALLBACK_TOP_K: usize = 5;

/// Refines the fused candidate order with a cross-encoder relevance
/// signal, recording each chunk's rank movement.
pub struct Reranker {
    top_k: usize,
}

impl Reranker {
    pub fn new(top_k: usize) -> Self {
        Self { top_k }
    }

    /// Rerank candidates against the question.
    ///
    /// On provider failure, falls back to the original candidates sorted
    /// by fusion score and truncated to [`FALLBACK_TOP_K`]; the fallback
    /// never raises.
    pub async fn rerank(
        &self,
        question: &str,
        candidates: Vec<ScoredChunk>,
        provider: &dyn RerankProvider,
    ) -> Vec<RankedChunk> {
        if candidates.is_empty() {
            return Vec::new();
        }

        let documents: Vec<String> = candidates
            .iter()
            .map(|c| c.chunk.content.clone())
            .collect();

        match provider.rerank(question, &documents).await {
            Ok(scores) if scores.len() == candidates.len() => {
                self.order_by_scores(candidates, &scores)
            }
            Ok(scores) => {
                log::warn!(
                    "Reranker returned {} scores for {} candidates, using fusion-score fallback",
                    scores.len(),
                    candidates.len()
                );
                fallback_by_fusion_score(candidates)
            }
            Err(e) => {
                log::warn!("Reranking failed, using fusion-score fallback: {e}");
                fallback_by_fusion_score(candidates)
            }
        }
    }

    fn order_by_scores(&self, candidates: Vec<ScoredChunk>, scores: &[f32]) -> Vec<RankedChunk> {
        let mut order: Vec<usize> = (0..candidates.len()).collect();
        order.sort_by(|a, b| {
            scores[*b]
                .partial_cmp(&scores[*a])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.cmp(b))
        });
        order.truncate(self.top_k);

        let reranked: Vec<RankedChunk> = order
            .iter()
            .enumerate()
            .map(|(new_pos, &original_pos)| {
                let candidate = candidates[original_pos].clone();
                RankedChunk {
                    chunk: candidate.chunk,
                    fusion_score: candidate.fusion_score,
                    rerank_score: scores[original_pos],
                    original_rank: original_pos + 1,
                    new_rank: new_pos + 1,
                }
            })
            .collect();

        for doc in &reranked {
            log::debug!(
                "Rerank {:.4}: rank {} -> {}",
                doc.rerank_score,
                doc.original_rank,
                doc.new_rank
            );
        }
        reranked
    }
}

/// Conservative degraded ordering: fusion score descending, stable on
/// the original rank, truncated to [`FALLBACK_TOP_K`]. The fusion score
/// doubles as the rerank score so the field is always populated.
fn fallback_by_fusion_score(candidates: Vec<ScoredChunk>) -> Vec<RankedChunk> {
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|a, b| {
        candidates[*b]
            .fusion_score
            .partial_cmp(&candidates[*a].fusion_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.cmp(b))
    });
    order.truncate(FALLBACK_TOP_K);

    order
        .iter()
        .enumerate()
        .map(|(new_pos, &original_pos)| {
            let candidate = candidates[original_pos].clone();
            RankedChunk {
                chunk: candidate.chunk,
                fusion_score: candidate.fusion_score,
                rerank_score: candidate.fusion_score,
                original_rank: original_pos + 1,
                new_rank: new_pos + 1,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RetrievalMethod;
    use logscout_log_chunker::{ChunkMetadata, LogChunk};
    use logscout_providers::stub::{FailingRerank, StubRerank};
    use pretty_assertions::assert_eq;

    fn candidate(content: &str, fusion_score: f32) -> ScoredChunk {
        ScoredChunk {
            chunk: LogChunk::new(
                "logs".to_string(),
                1,
                1,
                content.to_string(),
                ChunkMetadata::default(),
            ),
            fusion_score,
            method: RetrievalMethod::Fused,
        }
    }

    #[tokio::test]
    async fn test_rerank_reorders_and_records_movement() {
        let reranker = Reranker::new(10);
        let candidates = vec![
            candidate("normal startup banner", 0.033),
            candidate("error while mounting volume", 0.031),
        ];

        let reranked = reranker
            .rerank("volume mount error", candidates, &StubRerank)
            .await;

        assert_eq!(reranked.len(), 2);
        assert_eq!(reranked[0].original_rank, 2);
        assert_eq!(reranked[0].new_rank, 1);
        assert_eq!(reranked[0].rank_delta(), 1);
        assert!(reranked[0].rerank_score > reranked[1].rerank_score);
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_fusion_order_capped_at_five() {
        let reranker = Reranker::new(10);
        let candidates: Vec<ScoredChunk> = (0..8)
            .map(|i| candidate(&format!("log line {i}"), 0.1 * (8 - i) as f32))
            .collect();

        let reranked = reranker
            .rerank("anything", candidates, &FailingRerank)
            .await;

        assert_eq!(reranked.len(), FALLBACK_TOP_K);
        // Input was already in descending fusion order; fallback keeps it
        for (pos, doc) in reranked.iter().enumerate() {
            assert_eq!(doc.original_rank, pos + 1);
            assert_eq!(doc.new_rank, pos + 1);
        }
        let mut sorted = reranked.clone();
        sorted.sort_by(|a, b| b.fusion_score.partial_cmp(&a.fusion_score).unwrap());
        assert_eq!(sorted, reranked);
    }

    #[tokio::test]
    async fn test_truncates_to_top_k() {
        let reranker = Reranker::new(2);
        let candidates: Vec<ScoredChunk> = (0..6)
            .map(|i| candidate(&format!("mount failure detail {i}"), 0.5))
            .collect();

        let reranked = reranker
            .rerank("mount failure", candidates, &StubRerank)
            .await;
        assert_eq!(reranked.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_candidates_stay_empty() {
        let reranker = Reranker::new(10);
        let reranked = reranker.rerank("question", Vec::new(), &StubRerank).await;
        assert!(reranked.is_empty());
    }
}
