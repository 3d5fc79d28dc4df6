use crate::prompts;
use crate::state::{SessionState, StateUpdate};
use logscout_providers::{ChatMessage, ChatModel};

/// Rewrite the question to better match what the evidence actually
/// contains.
///
/// The previous question is appended to the transformation history and
/// the iteration counter advances, on failure too: a failed rewrite
/// still consumes retry budget, which is what keeps a persistently
/// failing rewrite backend from looping forever.
pub async fn transform_query(
    state: &SessionState,
    chat: &dyn ChatModel,
    preview_chars: usize,
    max_tokens: u32,
) -> StateUpdate {
    let evidence = state.combined_evidence();
    let preview = truncate_chars(&evidence, preview_chars);
    let preview = if preview.is_empty() {
        "No logs available"
    } else {
        preview
    };

    let iteration = state.iteration + 1;
    let mut history = state.transformation_history.clone();
    history.push(state.question.clone());

    let prompt = prompts::transform_prompt(&state.question, preview);
    let question = match chat.complete(&[ChatMessage::user(prompt)], max_tokens).await {
        Ok(rewritten) => {
            let rewritten = rewritten.trim().to_string();
            if rewritten.is_empty() {
                log::warn!("Rewrite came back empty, keeping original question");
                state.question.clone()
            } else {
                log::info!(
                    "Rewrote question (iteration {iteration}): '{}' -> '{rewritten}'",
                    state.question
                );
                rewritten
            }
        }
        Err(e) => {
            log::warn!("Query rewrite failed, keeping original question: {e}");
            state.question.clone()
        }
    };

    StateUpdate {
        question: Some(question),
        iteration: Some(iteration),
        transformation_history: Some(history),
        ..Default::default()
    }
}

/// Truncate on a character boundary without splitting a code point
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
