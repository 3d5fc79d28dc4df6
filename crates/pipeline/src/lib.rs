//! # Logscout Pipeline
//!
//! The retrieval-augmented self-correcting answer pipeline: given a
//! troubleshooting question and a session's raw log/event evidence, build
//! ephemeral hybrid indexes, fuse and rerank candidates, filter them
//! through a relevance grader, and generate a grounded answer, rewriting
//! the question and retrying, up to a hard iteration ceiling, whenever the
//! evidence is judged insufficient.
//!
//! ## Flow
//!
//! ```text
//! question + evidence
//!     │
//!     ├──> RETRIEVE   split, index (lexical + dense), fuse rankings
//!     ├──> RERANK     cross-encoder refinement (fallback: fusion order)
//!     ├──> GRADE      per-document yes/no relevance filter
//!     │      │
//!     │      ├─ sufficient ──> GENERATE ──> END
//!     │      └─ insufficient, budget left ──> TRANSFORM ──> RETRIEVE
//!     │
//!     └──> every node degrades to a non-throwing fallback, so the
//!          session always ends with a textual answer
//! ```
//!
//! Nothing is persisted: indexes, candidates, and scores are rebuilt from
//! nothing for every question and discarded with the session.

mod alert;
mod config;
mod controller;
mod error;
mod generate;
mod grade;
mod nodes;
mod prompts;
mod state;
mod transform;

pub use alert::{
    build_envelope, parse_alert_response, AlertEnvelope, AlertMeta, AlertPayload, AlertSource,
    ExtractedAlert, LogAlert, Severity,
};
pub use config::PipelineConfig;
pub use controller::Controller;
pub use error::{PipelineError, Result};
pub use generate::{GenerationOutput, NO_EVIDENCE_ANSWER};
pub use nodes::Nodes;
pub use prompts::INSUFFICIENT_MARKER;
pub use state::{SessionState, StateUpdate};
