use crate::prompts;
use logscout_providers::{ChatMessage, ChatModel};
use logscout_retrieval::RankedChunk;

/// Relevance score for a document the grading call could not judge; kept
/// rather than dropped so an infrastructure failure never suppresses
/// potentially critical evidence
const UNGRADED_SCORE: f32 = 0.5;

/// Classify each document as relevant or not to the current question.
///
/// Returns the kept documents and a score array aligned one-to-one with
/// them. The bias is inclusive: any affirmative token in the model's
/// response keeps the document, and a failed judgment call keeps it at
/// reduced confidence.
pub async fn grade_documents(
    question: &str,
    docs: &[RankedChunk],
    chat: &dyn ChatModel,
    max_tokens: u32,
) -> (Vec<RankedChunk>, Vec<f32>) {
    if docs.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let mut kept = Vec::with_capacity(docs.len());
    let mut scores = Vec::with_capacity(docs.len());

    for (i, doc) in docs.iter().enumerate() {
        let prompt = prompts::grading_prompt(question, &doc.chunk.content);
        match chat.complete(&[ChatMessage::user(prompt)], max_tokens).await {
            Ok(response) => {
                if response.to_ascii_lowercase().contains("yes") {
                    kept.push(doc.clone());
                    scores.push(1.0);
                } else {
                    log::debug!("Grader dropped document {}/{}", i + 1, docs.len());
                }
            }
            Err(e) => {
                log::warn!(
                    "Grading document {}/{} failed, keeping it: {e}",
                    i + 1,
                    docs.len()
                );
                kept.push(doc.clone());
                scores.push(UNGRADED_SCORE);
            }
        }
    }

    log::info!("Grader kept {}/{} documents", kept.len(), docs.len());
    (kept, scores)
}
