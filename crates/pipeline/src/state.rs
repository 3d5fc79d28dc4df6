use crate::alert::AlertEnvelope;
use crate::error::{PipelineError, Result};
use logscout_log_chunker::combine_evidence;
use logscout_retrieval::{QueryContext, RankedChunk, ScoredChunk};
use serde::{Deserialize, Serialize};

/// The single record threaded through every pipeline stage.
///
/// Nodes never mutate this directly; each returns a [`StateUpdate`] that
/// the controller merges into the authoritative copy. The whole record is
/// a plain serializable value: session-local, rebuilt from nothing per
/// question, discarded at session end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    /// Current question (possibly rewritten by self-correction)
    pub question: String,

    /// Raw log evidence, immutable for the session
    pub log_context: String,

    /// Optional event block, immutable for the session
    pub pod_events: String,

    /// Namespace of the workload; absent for infrastructure devices
    pub namespace: Option<String>,

    /// Pod under investigation, if any
    pub pod_name: Option<String>,

    /// Fused candidates from the last retrieval pass
    #[serde(default)]
    pub retrieved_docs: Vec<ScoredChunk>,

    /// Survivors of reranking and grading
    #[serde(default)]
    pub reranked_docs: Vec<RankedChunk>,

    /// Relevance scores aligned one-to-one with `reranked_docs`
    #[serde(default)]
    pub relevance_scores: Vec<f32>,

    /// Final answer text
    pub generation: Option<String>,

    /// Optional structured alert extracted alongside the answer
    pub alert: Option<AlertEnvelope>,

    /// Rewrite cycles completed so far
    pub iteration: u32,

    /// Prior question strings, oldest first
    #[serde(default)]
    pub transformation_history: Vec<String>,

    /// Rewrite ceiling for this session
    pub max_iterations: u32,
}

impl SessionState {
    /// Start a session for one question over the given evidence
    pub fn new(
        question: impl Into<String>,
        log_context: impl Into<String>,
        pod_events: impl Into<String>,
        max_iterations: u32,
    ) -> Self {
        Self {
            question: question.into(),
            log_context: log_context.into(),
            pod_events: pod_events.into(),
            namespace: None,
            pod_name: None,
            retrieved_docs: Vec::new(),
            reranked_docs: Vec::new(),
            relevance_scores: Vec::new(),
            generation: None,
            alert: None,
            iteration: 0,
            transformation_history: Vec::new(),
            max_iterations,
        }
    }

    /// Builder: attach workload scope identifiers
    #[must_use]
    pub fn with_scope(mut self, namespace: Option<String>, pod_name: Option<String>) -> Self {
        self.namespace = namespace;
        self.pod_name = pod_name;
        self
    }

    /// Logs plus the delimited event block, as one evidence text
    pub fn combined_evidence(&self) -> String {
        combine_evidence(&self.log_context, &self.pod_events)
    }

    /// Scope identifiers in the shape the retriever expects
    pub fn query_context(&self) -> QueryContext {
        QueryContext {
            pod_name: self.pod_name.clone(),
            namespace: self.namespace.clone(),
        }
    }

    /// Merge a node's partial update into this record
    pub fn apply(&mut self, update: StateUpdate) {
        if let Some(question) = update.question {
            self.question = question;
        }
        if let Some(docs) = update.retrieved_docs {
            self.retrieved_docs = docs;
        }
        if let Some(docs) = update.reranked_docs {
            self.reranked_docs = docs;
        }
        if let Some(scores) = update.relevance_scores {
            self.relevance_scores = scores;
        }
        if let Some(generation) = update.generation {
            self.generation = Some(generation);
        }
        if let Some(alert) = update.alert {
            self.alert = Some(alert);
        }
        if let Some(iteration) = update.iteration {
            self.iteration = iteration;
        }
        if let Some(history) = update.transformation_history {
            self.transformation_history = history;
        }
    }

    /// Check the counters the controller's termination guarantee rests on
    pub fn check_invariants(&self) -> Result<()> {
        if self.iteration > self.max_iterations {
            return Err(PipelineError::InvariantViolation(format!(
                "iteration {} exceeds max_iterations {}",
                self.iteration, self.max_iterations
            )));
        }
        if self.transformation_history.len() != self.iteration as usize {
            return Err(PipelineError::InvariantViolation(format!(
                "transformation_history length {} does not match iteration {}",
                self.transformation_history.len(),
                self.iteration
            )));
        }
        if self.reranked_docs.len() != self.relevance_scores.len() {
            return Err(PipelineError::InvariantViolation(format!(
                "{} graded docs but {} relevance scores",
                self.reranked_docs.len(),
                self.relevance_scores.len()
            )));
        }
        Ok(())
    }
}

/// A node's partial contribution to the session record; `None` fields
/// leave the authoritative value untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateUpdate {
    pub question: Option<String>,
    pub retrieved_docs: Option<Vec<ScoredChunk>>,
    pub reranked_docs: Option<Vec<RankedChunk>>,
    pub relevance_scores: Option<Vec<f32>>,
    pub generation: Option<String>,
    pub alert: Option<AlertEnvelope>,
    pub iteration: Option<u32>,
    pub transformation_history: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn state() -> SessionState {
        SessionState::new("why is the pod failing", "some logs", "", 3)
    }

    #[test]
    fn test_apply_merges_only_set_fields() {
        let mut state = state();
        state.apply(StateUpdate {
            question: Some("rewritten".to_string()),
            iteration: Some(1),
            transformation_history: Some(vec!["why is the pod failing".to_string()]),
            ..Default::default()
        });

        assert_eq!(state.question, "rewritten");
        assert_eq!(state.iteration, 1);
        assert_eq!(state.log_context, "some logs");
        assert!(state.generation.is_none());
    }

    #[test]
    fn test_combined_evidence_appends_event_section() {
        let state = SessionState::new("q", "log line", "Warning FailedMount", 3);
        let combined = state.combined_evidence();
        assert!(combined.starts_with("log line"));
        assert!(combined.contains("=== Pod Events ==="));
        assert!(combined.ends_with("Warning FailedMount"));
    }

    #[test]
    fn test_invariants_hold_initially() {
        assert!(state().check_invariants().is_ok());
    }

    #[test]
    fn test_iteration_overflow_detected() {
        let mut state = state();
        state.iteration = 4;
        state.transformation_history = vec!["a".into(), "b".into(), "c".into(), "d".into()];
        assert!(state.check_invariants().is_err());
    }

    #[test]
    fn test_history_alignment_detected() {
        let mut state = state();
        state.iteration = 1;
        assert!(state.check_invariants().is_err());
    }

    #[test]
    fn test_state_round_trips_through_json() {
        let state = state().with_scope(Some("prod".to_string()), Some("web-1".to_string()));
        let json = serde_json::to_string(&state).unwrap();
        let parsed: SessionState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.question, state.question);
        assert_eq!(parsed.namespace.as_deref(), Some("prod"));
    }
}
