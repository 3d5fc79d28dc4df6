use crate::alert::{self, AlertEnvelope};
use crate::config::PipelineConfig;
use crate::prompts;
use crate::state::SessionState;
use logscout_providers::{ChatMessage, ChatModel, ModelSelection};

/// Terminal answer when no evidence survived retrieval and grading.
/// A defined success outcome, not a failure.
pub const NO_EVIDENCE_ANSWER: &str = "No relevant log evidence was found to answer this \
question. Try rephrasing it, or confirm that logs are available for this workload.";

/// The answer plus the optional structured alert
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    pub generation: String,
    pub alert: Option<AlertEnvelope>,
}

/// Produce the user-facing grounded answer and, when the session has an
/// orchestration namespace, attempt the secondary structured alert
/// extraction.
///
/// Always returns a textual answer: empty evidence yields the fixed
/// no-evidence message, and a failed generation call yields an
/// explanatory string. The alert path never affects the primary answer.
pub async fn generate_answer(
    state: &SessionState,
    chat: &dyn ChatModel,
    selection: &ModelSelection,
    config: &PipelineConfig,
) -> GenerationOutput {
    if state.reranked_docs.is_empty() {
        log::info!("No evidence to generate from, returning fixed answer");
        return GenerationOutput {
            generation: NO_EVIDENCE_ANSWER.to_string(),
            alert: None,
        };
    }

    let namespace = state.namespace.as_deref();
    let evidence = prompts::evidence_block(&state.reranked_docs);
    let system = prompts::answer_system_prompt(namespace);
    let user = prompts::answer_user_prompt(
        &prompts::component_context(namespace, state.pod_name.as_deref()),
        &state.question,
        &evidence,
    );

    let messages = [ChatMessage::system(system), ChatMessage::user(user)];
    let generation = match chat.complete(&messages, config.answer_max_tokens).await {
        Ok(answer) => {
            let mut text = answer;
            text.push_str(&metadata_trailer(state, selection));
            text
        }
        Err(e) => {
            log::warn!("Answer generation failed: {e}");
            format!(
                "The analysis backend was unavailable, so no grounded answer could \
                 be produced for this question ({} evidence snippets were retrieved). \
                 Please retry.",
                state.reranked_docs.len()
            )
        }
    };

    let alert = match namespace.filter(|n| !n.is_empty()) {
        Some(namespace) => {
            extract_alert(state, namespace, &evidence, chat, config).await
        }
        None => None,
    };

    GenerationOutput { generation, alert }
}

/// Deterministic trailer describing how the answer was produced
fn metadata_trailer(state: &SessionState, selection: &ModelSelection) -> String {
    format!(
        "\n\n---\nAnalysis metadata:\n\
         - Model: {}\n\
         - Provider: {}\n\
         - Evidence: {} log snippets\n\
         - Iteration: {}\n",
        selection.display_name,
        selection.provider.as_str(),
        state.reranked_docs.len(),
        state.iteration
    )
}

/// Second, strictly machine-parsable generation call. Any failure,
/// transport or malformed payload, only omits the alert.
async fn extract_alert(
    state: &SessionState,
    namespace: &str,
    evidence: &str,
    chat: &dyn ChatModel,
    config: &PipelineConfig,
) -> Option<AlertEnvelope> {
    let messages = [
        ChatMessage::system(prompts::alert_system_prompt(
            namespace,
            state.pod_name.as_deref(),
        )),
        ChatMessage::user(prompts::alert_user_prompt(&state.question, evidence)),
    ];

    let response = match chat.complete(&messages, config.alert_max_tokens).await {
        Ok(response) => response,
        Err(e) => {
            log::warn!("Alert extraction call failed, omitting alert: {e}");
            return None;
        }
    };

    match alert::parse_alert_response(&response) {
        Ok(extracted) => {
            log::info!("Extracted structured alert: {}", extracted.alert_name);
            Some(alert::build_envelope(
                extracted,
                namespace,
                state.pod_name.as_deref(),
                &state.question,
            ))
        }
        Err(e) => {
            log::warn!("Alert payload unparsable, omitting alert: {e}");
            None
        }
    }
}
