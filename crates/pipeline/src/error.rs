use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Fatal pipeline conditions.
///
/// Every node absorbs its own backend failures, so the only errors that
/// surface here are controller invariant violations: a corrupted
/// iteration counter or a loop that failed to terminate inside its
/// ceiling.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(
        "Iteration ceiling exceeded: {passes} retrieval passes with max_iterations={max_iterations}"
    )]
    IterationOverflow { passes: u32, max_iterations: u32 },

    #[error("State invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
