use crate::augment::{QueryAugmenter, QueryContext};
use crate::error::Result;
use crate::fusion::{rrf_fuse, RRF_K};
use crate::types::ScoredChunk;
use logscout_hybrid_index::HybridIndex;
use logscout_log_chunker::Splitter;
use logscout_providers::EmbeddingProvider;

/// Evidence shorter than this is not worth indexing; retrieval
/// short-circuits to an empty candidate list (a defined branch, not an
/// error)
pub const MIN_EVIDENCE_CHARS: usize = 50;

/// Builds the ephemeral hybrid index for one question and produces a
/// single fused candidate ranking.
///
/// `retrieve` never raises into the caller: every internal failure is
/// logged and converted to an empty result, so the controller only ever
/// branches on list contents.
pub struct HybridRetriever {
    splitter: Splitter,
    augmenter: QueryAugmenter,
    k: usize,
    fusion_k: f32,
}

impl HybridRetriever {
    /// Create a retriever that takes `k` results from each underlying
    /// ranker; the fused list is capped at `2 * k`.
    pub fn new(k: usize) -> Self {
        Self {
            splitter: Splitter::default(),
            augmenter: QueryAugmenter::new(),
            k,
            fusion_k: RRF_K,
        }
    }

    /// Replace the default splitter
    #[must_use]
    pub fn with_splitter(mut self, splitter: Splitter) -> Self {
        self.splitter = splitter;
        self
    }

    /// Retrieve candidates for the question over the given evidence text.
    ///
    /// Returns an empty list when the evidence is below the minimum
    /// length, when both sub-retrievals come back empty, or when anything
    /// inside indexing/querying fails.
    pub async fn retrieve(
        &self,
        question: &str,
        ctx: &QueryContext,
        evidence: &str,
        embedder: &dyn EmbeddingProvider,
    ) -> Vec<ScoredChunk> {
        if evidence.trim().len() < MIN_EVIDENCE_CHARS {
            log::warn!(
                "Evidence below {MIN_EVIDENCE_CHARS} chars, skipping retrieval"
            );
            return Vec::new();
        }

        match self.try_retrieve(question, ctx, evidence, embedder).await {
            Ok(candidates) => candidates,
            Err(e) => {
                log::warn!("Retrieval failed, returning no candidates: {e}");
                Vec::new()
            }
        }
    }

    async fn try_retrieve(
        &self,
        question: &str,
        ctx: &QueryContext,
        evidence: &str,
        embedder: &dyn EmbeddingProvider,
    ) -> Result<Vec<ScoredChunk>> {
        let index = HybridIndex::build(evidence, &self.splitter, embedder).await;
        if index.is_empty() {
            return Ok(Vec::new());
        }

        let enhanced_query = self.augmenter.augment(question, ctx, evidence);

        let lexical_hits = index.lexical().query(&enhanced_query, self.k);
        log::debug!("Lexical: {} results", lexical_hits.len());

        let dense_hits = self.dense_hits(&enhanced_query, &index, embedder).await;
        log::debug!("Dense: {} results", dense_hits.len());

        let fused = rrf_fuse(&lexical_hits, &dense_hits, self.fusion_k);
        log::debug!("Fused: {} results", fused.len());

        let chunks = index.chunks();
        let mut candidates: Vec<ScoredChunk> = fused
            .into_iter()
            .filter_map(|hit| {
                chunks.get(hit.idx).map(|chunk| ScoredChunk {
                    chunk: chunk.clone(),
                    fusion_score: hit.score,
                    method: hit.method,
                })
            })
            .collect();
        candidates.truncate(self.k * 2);

        log::info!("Retrieved {} candidates", candidates.len());
        Ok(candidates)
    }

    /// Query the dense side; any failure here only removes the dense
    /// contribution from fusion
    async fn dense_hits(
        &self,
        query: &str,
        index: &HybridIndex,
        embedder: &dyn EmbeddingProvider,
    ) -> Vec<(usize, f32)> {
        if index.dense().is_empty() {
            return Vec::new();
        }

        let query_vector = match embedder.embed(&[query.to_string()]).await {
            Ok(mut vectors) if !vectors.is_empty() => vectors.remove(0),
            Ok(_) => {
                log::warn!("Query embedding came back empty, dense side skipped");
                return Vec::new();
            }
            Err(e) => {
                log::warn!("Query embedding failed, dense side skipped: {e}");
                return Vec::new();
            }
        };

        match index.dense().query(&query_vector, self.k) {
            Ok(hits) => hits,
            Err(e) => {
                log::warn!("Dense query failed, dense side skipped: {e}");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use logscout_providers::stub::{FailingEmbedding, StubEmbedding};
    use logscout_providers::ProviderError;

    const EVIDENCE: &str = "2024-01-10T12:00:01Z ERROR failed to mount volume \"config\"\n\
                            2024-01-10T12:00:02Z WARN MountVolume.SetUp failed for volume config\n\
                            \n\
                            2024-01-10T12:00:04Z INFO readiness probe pending for pod web-1\n\
                            \n\
                            2024-01-10T12:00:05Z INFO metrics scrape completed in 12ms";

    #[tokio::test]
    async fn test_retrieves_fused_candidates() {
        let retriever = HybridRetriever::new(10);
        let candidates = retriever
            .retrieve(
                "why did the volume mount fail",
                &QueryContext::default(),
                EVIDENCE,
                &StubEmbedding::default(),
            )
            .await;

        assert!(!candidates.is_empty());
        assert!(candidates.len() <= 20);
        // Mount-failure chunk should dominate the ranking
        assert!(candidates[0].chunk.content.to_ascii_lowercase().contains("mount"));
        assert!(candidates[0].fusion_score > 0.0);
    }

    #[tokio::test]
    async fn test_short_evidence_short_circuits() {
        let retriever = HybridRetriever::new(10);
        let candidates = retriever
            .retrieve(
                "anything wrong?",
                &QueryContext::default(),
                "tiny log",
                &StubEmbedding::default(),
            )
            .await;
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn test_embedding_failure_still_yields_lexical_candidates() {
        let retriever = HybridRetriever::new(10);
        let candidates = retriever
            .retrieve(
                "volume mount failure",
                &QueryContext::default(),
                EVIDENCE,
                &FailingEmbedding,
            )
            .await;

        assert!(!candidates.is_empty());
        assert!(candidates
            .iter()
            .all(|c| c.method == crate::types::RetrievalMethod::Lexical));
    }

    /// Embedder that indexes chunks fine but fails on the query call
    struct QueryFailingEmbedding {
        inner: StubEmbedding,
    }

    #[async_trait]
    impl EmbeddingProvider for QueryFailingEmbedding {
        async fn embed(
            &self,
            texts: &[String],
        ) -> logscout_providers::Result<Vec<Vec<f32>>> {
            if texts.len() == 1 {
                return Err(ProviderError::Other("query embed down".to_string()));
            }
            self.inner.embed(texts).await
        }
    }

    #[tokio::test]
    async fn test_query_embed_failure_degrades_to_lexical() {
        let retriever = HybridRetriever::new(10);
        let embedder = QueryFailingEmbedding {
            inner: StubEmbedding::default(),
        };
        let candidates = retriever
            .retrieve(
                "volume mount failure",
                &QueryContext::default(),
                EVIDENCE,
                &embedder,
            )
            .await;

        assert!(!candidates.is_empty());
        assert!(candidates
            .iter()
            .all(|c| c.method == crate::types::RetrievalMethod::Lexical));
    }

    #[tokio::test]
    async fn test_retrieval_is_deterministic() {
        let retriever = HybridRetriever::new(10);
        let embedder = StubEmbedding::default();
        let ctx = QueryContext::default();

        let first = retriever
            .retrieve("mount failure", &ctx, EVIDENCE, &embedder)
            .await;
        let second = retriever
            .retrieve("mount failure", &ctx, EVIDENCE, &embedder)
            .await;
        assert_eq!(first, second);
    }
}
