use crate::dense::DenseIndex;
use crate::lexical::LexicalIndex;
use logscout_log_chunker::{LogChunk, Splitter};
use logscout_providers::EmbeddingProvider;

/// Both retrievable representations of one question's evidence, built
/// fresh per query and discarded with the session.
pub struct HybridIndex {
    chunks: Vec<LogChunk>,
    lexical: LexicalIndex,
    dense: DenseIndex,
}

impl HybridIndex {
    /// Split the evidence text and build both indexes over the same chunk
    /// set.
    ///
    /// Building is idempotent and side-effect-free. The embedding call may
    /// fail; retrieval then degrades to lexical-only, with the dense index
    /// left empty.
    pub async fn build(
        text: &str,
        splitter: &Splitter,
        embedder: &dyn EmbeddingProvider,
    ) -> Self {
        let chunks = splitter.split(text);
        Self::build_from_chunks(chunks, embedder).await
    }

    /// Build both indexes over an already-split chunk set
    pub async fn build_from_chunks(
        chunks: Vec<LogChunk>,
        embedder: &dyn EmbeddingProvider,
    ) -> Self {
        let lexical = LexicalIndex::build(&chunks);
        let dense = Self::build_dense(&chunks, embedder).await;

        log::info!(
            "Built hybrid index: {} chunks, dense={}",
            chunks.len(),
            if dense.is_empty() { "degraded (lexical only)" } else { "ready" }
        );

        Self {
            chunks,
            lexical,
            dense,
        }
    }

    async fn build_dense(chunks: &[LogChunk], embedder: &dyn EmbeddingProvider) -> DenseIndex {
        if chunks.is_empty() {
            return DenseIndex::empty();
        }

        let contents: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let vectors = match embedder.embed(&contents).await {
            Ok(vectors) => vectors,
            Err(e) => {
                log::warn!("Embedding failed, dense retrieval degraded: {e}");
                return DenseIndex::empty();
            }
        };

        if vectors.len() != chunks.len() {
            log::warn!(
                "Embedding returned {} vectors for {} chunks, dense retrieval degraded",
                vectors.len(),
                chunks.len()
            );
            return DenseIndex::empty();
        }

        match DenseIndex::from_vectors(vectors) {
            Ok(index) => index,
            Err(e) => {
                log::warn!("Dense index rejected vectors, dense retrieval degraded: {e}");
                DenseIndex::empty()
            }
        }
    }

    /// The chunk set both indexes rank over
    pub fn chunks(&self) -> &[LogChunk] {
        &self.chunks
    }

    /// Lexical term-frequency side
    pub fn lexical(&self) -> &LexicalIndex {
        &self.lexical
    }

    /// Dense embedding side (may be empty in degraded mode)
    pub fn dense(&self) -> &DenseIndex {
        &self.dense
    }

    /// True when the evidence produced no chunks at all
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}
