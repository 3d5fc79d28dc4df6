use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};

/// Tuning knobs for one troubleshooting session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Results taken from each underlying ranker before fusion
    pub retrieve_k: usize,

    /// Candidates kept after reranking
    pub rerank_top_k: usize,

    /// Minimum mean relevance of the graded set; below this the
    /// controller rewrites the query instead of generating. The grader's
    /// inclusive bias makes this a recall-over-precision knob, not a hard
    /// rule.
    pub relevance_threshold: f32,

    /// Rewrite cycles allowed before generation is forced
    pub max_iterations: u32,

    /// Evidence below this many characters skips retrieval entirely
    pub min_evidence_chars: usize,

    /// Characters of raw evidence shown to the query rewriter
    pub evidence_preview_chars: usize,

    /// Output-token budget for the final answer
    pub answer_max_tokens: u32,

    /// Output-token budget for each per-document grading call
    pub grade_max_tokens: u32,

    /// Output-token budget for a query rewrite
    pub transform_max_tokens: u32,

    /// Output-token budget for the structured alert extraction
    pub alert_max_tokens: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            retrieve_k: 10,
            rerank_top_k: 10,
            relevance_threshold: 0.4,
            max_iterations: 3,
            min_evidence_chars: 50,
            evidence_preview_chars: 500,
            answer_max_tokens: 500,
            grade_max_tokens: 100,
            transform_max_tokens: 100,
            alert_max_tokens: 1500,
        }
    }
}

impl PipelineConfig {
    /// Config for fast, shallow analysis (single retrieval pass)
    pub fn for_quick_checks() -> Self {
        Self {
            retrieve_k: 5,
            rerank_top_k: 5,
            max_iterations: 1,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.retrieve_k == 0 {
            return Err(PipelineError::InvalidConfig(
                "retrieve_k must be at least 1".to_string(),
            ));
        }
        if self.rerank_top_k == 0 {
            return Err(PipelineError::InvalidConfig(
                "rerank_top_k must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.relevance_threshold) {
            return Err(PipelineError::InvalidConfig(format!(
                "relevance_threshold {} outside [0, 1]",
                self.relevance_threshold
            )));
        }
        if self.evidence_preview_chars == 0 {
            return Err(PipelineError::InvalidConfig(
                "evidence_preview_chars must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
        assert!(PipelineConfig::for_quick_checks().validate().is_ok());
    }

    #[test]
    fn test_threshold_bounds_enforced() {
        let config = PipelineConfig {
            relevance_threshold: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_round_trips_through_toml() {
        let config = PipelineConfig::default();
        let text = toml::to_string(&config).unwrap();
        let parsed: PipelineConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.retrieve_k, config.retrieve_k);
        assert_eq!(parsed.max_iterations, config.max_iterations);
    }
}
