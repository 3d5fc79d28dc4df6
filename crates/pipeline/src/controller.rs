use crate::error::{PipelineError, Result};
use crate::nodes::Nodes;
use crate::prompts::INSUFFICIENT_MARKER;
use crate::state::SessionState;

/// The self-correction state machine.
///
/// Stages run strictly in order: RETRIEVE, RERANK, GRADE, then either
/// GENERATE or a query TRANSFORM that loops back to RETRIEVE. A transform
/// is only taken while rewrite budget remains, and every transform
/// consumes budget, so the session always terminates within
/// `max_iterations + 1` retrieval passes no matter which node fallbacks
/// fire along the way.
pub struct Controller {
    nodes: Nodes,
}

impl Controller {
    pub fn new(nodes: Nodes) -> Self {
        Self { nodes }
    }

    /// Drive one session to its terminal state.
    ///
    /// The only error paths out of here are controller invariant
    /// violations; node failures have all been absorbed upstream.
    pub async fn run(&self, mut state: SessionState) -> Result<SessionState> {
        state.check_invariants()?;

        // A rewrite cannot create evidence, so sub-threshold evidence is
        // terminal: one retrieval pass (which short-circuits to an empty
        // list), then straight to the fixed no-evidence answer without
        // touching the reranker or grader.
        let evidence_too_short = state.combined_evidence().trim().len()
            < self.nodes.config().min_evidence_chars;

        let mut passes: u32 = 0;
        loop {
            passes += 1;
            if passes > state.max_iterations + 1 {
                return Err(PipelineError::IterationOverflow {
                    passes,
                    max_iterations: state.max_iterations,
                });
            }
            log::info!(
                "Retrieval pass {passes} (iteration {}/{})",
                state.iteration,
                state.max_iterations
            );

            let update = self.nodes.retrieve(&state).await;
            state.apply(update);

            if evidence_too_short {
                log::warn!("Evidence below minimum length, generating terminal answer");
                let update = self.nodes.generate(&state).await;
                state.apply(update);
                return Ok(state);
            }

            let update = self.nodes.rerank(&state).await;
            state.apply(update);

            let update = self.nodes.grade(&state).await;
            state.apply(update);
            state.check_invariants()?;

            if self.evidence_insufficient(&state) && state.iteration < state.max_iterations {
                let update = self.nodes.transform(&state).await;
                state.apply(update);
                state.check_invariants()?;
                continue;
            }

            let update = self.nodes.generate(&state).await;
            state.apply(update);

            if self.generation_flags_insufficient(&state)
                && state.iteration < state.max_iterations
            {
                log::info!("Generation flagged insufficient grounding, rewriting query");
                let update = self.nodes.transform(&state).await;
                state.apply(update);
                state.check_invariants()?;
                continue;
            }

            log::info!(
                "Session finished after {passes} retrieval passes, {} rewrites",
                state.iteration
            );
            return Ok(state);
        }
    }

    /// GRADE -> TRANSFORM condition: nothing survived grading, or what
    /// survived carries too little confidence
    fn evidence_insufficient(&self, state: &SessionState) -> bool {
        if state.reranked_docs.is_empty() {
            return true;
        }
        let mean = state.relevance_scores.iter().sum::<f32>()
            / state.relevance_scores.len() as f32;
        mean < self.nodes.config().relevance_threshold
    }

    /// GENERATE -> TRANSFORM condition: the answer itself reports that
    /// the evidence could not support it
    fn generation_flags_insufficient(&self, state: &SessionState) -> bool {
        state
            .generation
            .as_deref()
            .is_some_and(|g| g.contains(INSUFFICIENT_MARKER))
    }
}
