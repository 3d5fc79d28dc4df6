use crate::config::PipelineConfig;
use crate::error::Result;
use crate::generate;
use crate::grade;
use crate::state::{SessionState, StateUpdate};
use crate::transform;
use logscout_providers::{ChatModel, EmbeddingProvider, ModelSelection, RerankProvider};
use logscout_retrieval::{HybridRetriever, Reranker};
use std::sync::Arc;

/// The pipeline's node implementations, sharing one set of injected
/// provider capabilities and one model selection per session.
///
/// Each node reads the session record and returns a partial update; only
/// the controller merges updates back, so no node ever sees another's
/// half-applied write.
pub struct Nodes {
    chat: Arc<dyn ChatModel>,
    embedder: Arc<dyn EmbeddingProvider>,
    rerank_provider: Arc<dyn RerankProvider>,
    selection: ModelSelection,
    config: PipelineConfig,
    retriever: HybridRetriever,
    reranker: Reranker,
}

impl Nodes {
    pub fn new(
        chat: Arc<dyn ChatModel>,
        embedder: Arc<dyn EmbeddingProvider>,
        rerank_provider: Arc<dyn RerankProvider>,
        selection: ModelSelection,
        config: PipelineConfig,
    ) -> Result<Self> {
        config.validate()?;
        let retriever = HybridRetriever::new(config.retrieve_k);
        let reranker = Reranker::new(config.rerank_top_k);
        log::info!(
            "Initialized pipeline nodes with model '{}'",
            selection.display_name
        );
        Ok(Self {
            chat,
            embedder,
            rerank_provider,
            selection,
            config,
            retriever,
            reranker,
        })
    }

    /// Session tuning knobs
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Build the ephemeral hybrid index and produce fused candidates
    pub async fn retrieve(&self, state: &SessionState) -> StateUpdate {
        log::debug!("Node retrieve: question='{}'", state.question);
        let evidence = state.combined_evidence();
        let candidates = self
            .retriever
            .retrieve(
                &state.question,
                &state.query_context(),
                &evidence,
                self.embedder.as_ref(),
            )
            .await;

        StateUpdate {
            retrieved_docs: Some(candidates),
            ..Default::default()
        }
    }

    /// Refine the fused order with the cross-encoder signal
    pub async fn rerank(&self, state: &SessionState) -> StateUpdate {
        log::debug!("Node rerank: {} candidates", state.retrieved_docs.len());
        let reranked = self
            .reranker
            .rerank(
                &state.question,
                state.retrieved_docs.clone(),
                self.rerank_provider.as_ref(),
            )
            .await;

        StateUpdate {
            reranked_docs: Some(reranked),
            ..Default::default()
        }
    }

    /// Filter the reranked list to documents judged relevant
    pub async fn grade(&self, state: &SessionState) -> StateUpdate {
        log::debug!("Node grade: {} documents", state.reranked_docs.len());
        let (kept, scores) = grade::grade_documents(
            &state.question,
            &state.reranked_docs,
            self.chat.as_ref(),
            self.config.grade_max_tokens,
        )
        .await;

        StateUpdate {
            reranked_docs: Some(kept),
            relevance_scores: Some(scores),
            ..Default::default()
        }
    }

    /// Produce the grounded answer and optional structured alert
    pub async fn generate(&self, state: &SessionState) -> StateUpdate {
        log::debug!(
            "Node generate: {} evidence documents, iteration {}",
            state.reranked_docs.len(),
            state.iteration
        );
        let output = generate::generate_answer(
            state,
            self.chat.as_ref(),
            &self.selection,
            &self.config,
        )
        .await;

        StateUpdate {
            generation: Some(output.generation),
            alert: output.alert,
            ..Default::default()
        }
    }

    /// Rewrite the question for the next retrieval pass
    pub async fn transform(&self, state: &SessionState) -> StateUpdate {
        log::debug!("Node transform: iteration {}", state.iteration);
        transform::transform_query(
            state,
            self.chat.as_ref(),
            self.config.evidence_preview_chars,
            self.config.transform_max_tokens,
        )
        .await
    }
}
