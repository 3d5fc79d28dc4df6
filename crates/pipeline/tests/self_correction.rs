use async_trait::async_trait;
use logscout_pipeline::{
    Controller, Nodes, PipelineConfig, SessionState, INSUFFICIENT_MARKER, NO_EVIDENCE_ANSWER,
};
use logscout_providers::stub::{FailingChat, FailingEmbedding, FailingRerank, StubChat, StubEmbedding, StubRerank};
use logscout_providers::{
    ChatMessage, ChatModel, EmbeddingProvider, ModelSelection, ProviderKind, RerankProvider,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const EVIDENCE: &str = "connection error while calling the upstream billing service\n\
                        \n\
                        disk error detected during volume mount for data directory\n\
                        \n\
                        routine startup banner, all services healthy and ready";

fn selection() -> ModelSelection {
    ModelSelection {
        id: "local-small".to_string(),
        display_name: "Local 3B (fast)".to_string(),
        provider: ProviderKind::LocalInference,
        endpoint: "http://localhost:8000/v1".to_string(),
        api_key: None,
        model_id: "test-model".to_string(),
    }
}

fn controller(
    chat: Arc<dyn ChatModel>,
    embedder: Arc<dyn EmbeddingProvider>,
    rerank: Arc<dyn RerankProvider>,
) -> Controller {
    let nodes = Nodes::new(
        chat,
        embedder,
        rerank,
        selection(),
        PipelineConfig::default(),
    )
    .expect("valid config");
    Controller::new(nodes)
}

/// Embedder wrapper that counts calls; each retrieval pass costs one
/// batch call plus one query call
struct CountingEmbedding {
    inner: StubEmbedding,
    calls: AtomicUsize,
}

impl CountingEmbedding {
    fn new() -> Self {
        Self {
            inner: StubEmbedding::default(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for CountingEmbedding {
    async fn embed(&self, texts: &[String]) -> logscout_providers::Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.embed(texts).await
    }
}

/// Chat that answers grading prompts from the document content, rewrites
/// queries when asked, and otherwise produces a canned answer, recording
/// every prompt it sees
struct ScenarioChat {
    prompts: Mutex<Vec<String>>,
}

impl ScenarioChat {
    fn new() -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn recorded(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScenarioChat {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        _max_tokens: u32,
    ) -> logscout_providers::Result<String> {
        let text = messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        self.prompts.lock().unwrap().push(text.clone());

        if text.contains("Is this document relevant?") {
            let document = text
                .split("Log document:")
                .nth(1)
                .and_then(|rest| rest.split("Criteria:").next())
                .unwrap_or("");
            let verdict = if document.contains("error") { "yes" } else { "no" };
            return Ok(verdict.to_string());
        }
        if text.contains("Return only the rewritten question") {
            return Ok("which error entries explain the failure".to_string());
        }
        Ok("ISSUE: repeated error entries in the logs".to_string())
    }
}

/// Chat whose generations always flag insufficient grounding
struct InsufficientChat;

#[async_trait]
impl ChatModel for InsufficientChat {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        _max_tokens: u32,
    ) -> logscout_providers::Result<String> {
        let text = messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        if text.contains("Is this document relevant?") {
            return Ok("yes".to_string());
        }
        if text.contains("Return only the rewritten question") {
            return Ok("what does the disk error mean".to_string());
        }
        Ok(format!(
            "{INSUFFICIENT_MARKER}: the snippets do not describe the reported failure"
        ))
    }
}

#[tokio::test]
async fn grader_rejecting_everything_exhausts_budget_then_ends() {
    let _ = env_logger::builder().is_test(true).try_init();

    // "no" drops every document in grading and doubles as the rewritten
    // question, so every pass loops until the budget is gone
    let chat = Arc::new(StubChat::always("no"));
    let embedder = Arc::new(CountingEmbedding::new());
    let controller = controller(chat, embedder.clone(), Arc::new(StubRerank));

    let state = SessionState::new("what errors occurred", EVIDENCE, "", 2);
    let final_state = controller.run(state).await.expect("terminates cleanly");

    // Exactly max_iterations rewrites were recorded, then generation ran
    // with empty evidence
    assert_eq!(final_state.iteration, 2);
    assert_eq!(final_state.transformation_history.len(), 2);
    assert_eq!(
        final_state.transformation_history[0],
        "what errors occurred"
    );
    assert_eq!(final_state.generation.as_deref(), Some(NO_EVIDENCE_ANSWER));
    assert!(final_state.alert.is_none());

    // max_iterations + 1 retrieval passes, two embedding calls each
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 6);
}

#[tokio::test]
async fn every_backend_failing_still_produces_text() {
    let controller = controller(
        Arc::new(FailingChat),
        Arc::new(FailingEmbedding),
        Arc::new(FailingRerank),
    );

    let state = SessionState::new("what errors occurred", EVIDENCE, "", 2);
    let final_state = controller.run(state).await.expect("terminates cleanly");

    // Lexical retrieval still found candidates, the rerank fallback kept
    // them, grading kept them at half confidence, and generation degraded
    // to an explanatory string, all in a single pass
    assert_eq!(final_state.iteration, 0);
    assert!(!final_state.reranked_docs.is_empty());
    assert!(final_state
        .relevance_scores
        .iter()
        .all(|score| (*score - 0.5).abs() < f32::EPSILON));
    let generation = final_state.generation.expect("always a textual answer");
    assert!(generation.contains("unavailable"));
}

#[tokio::test]
async fn short_evidence_short_circuits_to_terminal_answer() {
    let chat = Arc::new(StubChat::always("yes"));
    let controller = controller(
        chat.clone(),
        Arc::new(StubEmbedding::default()),
        Arc::new(StubRerank),
    );

    let state = SessionState::new("anything wrong?", "tiny log", "", 3);
    let final_state = controller.run(state).await.expect("terminates cleanly");

    assert_eq!(final_state.generation.as_deref(), Some(NO_EVIDENCE_ANSWER));
    assert!(final_state.retrieved_docs.is_empty());
    assert_eq!(final_state.iteration, 0);
    // Neither the grader nor the generator touched the model
    assert_eq!(chat.call_count(), 0);
}

#[tokio::test]
async fn error_chunks_survive_grading_and_reach_the_answer() {
    let chat = Arc::new(ScenarioChat::new());
    let controller = controller(
        chat.clone(),
        Arc::new(StubEmbedding::default()),
        Arc::new(StubRerank),
    );

    let state = SessionState::new("what errors occurred", EVIDENCE, "", 2);
    let final_state = controller.run(state).await.expect("terminates cleanly");

    // Both error-bearing chunks kept, the healthy banner dropped
    assert_eq!(final_state.reranked_docs.len(), 2);
    assert!(final_state
        .reranked_docs
        .iter()
        .all(|doc| doc.chunk.content.contains("error")));
    assert_eq!(final_state.relevance_scores, vec![1.0, 1.0]);

    // The generation prompt carried exactly the surviving evidence
    let prompts = chat.recorded();
    let answer_prompt = prompts
        .iter()
        .find(|p| p.contains("Log evidence:"))
        .expect("generation prompt recorded");
    assert!(answer_prompt.contains("connection error while calling"));
    assert!(answer_prompt.contains("disk error detected"));
    assert!(!answer_prompt.contains("routine startup banner"));

    let generation = final_state.generation.expect("answer produced");
    assert!(generation.starts_with("ISSUE: repeated error entries"));
    assert!(generation.contains("Evidence: 2 log snippets"));
}

#[tokio::test]
async fn insufficient_grounding_flag_consumes_rewrite_budget() {
    let controller = controller(
        Arc::new(InsufficientChat),
        Arc::new(StubEmbedding::default()),
        Arc::new(StubRerank),
    );

    let state = SessionState::new("what errors occurred", EVIDENCE, "", 1);
    let final_state = controller.run(state).await.expect("terminates cleanly");

    // One rewrite was spent on the flagged generation; the second
    // generation still flags but the budget is exhausted, so it ends
    assert_eq!(final_state.iteration, 1);
    assert_eq!(
        final_state.transformation_history,
        vec!["what errors occurred".to_string()]
    );
    assert_eq!(final_state.question, "what does the disk error mean");
    let generation = final_state.generation.expect("answer produced");
    assert!(generation.contains(INSUFFICIENT_MARKER));
}

#[tokio::test]
async fn rerank_failure_caps_evidence_at_conservative_five() {
    let evidence = (0..8)
        .map(|i| format!("timeout error contacting replica {i} of the storage backend"))
        .collect::<Vec<_>>()
        .join("\n\n");

    let chat = Arc::new(StubChat::always("yes"));
    let controller = controller(
        chat,
        Arc::new(StubEmbedding::default()),
        Arc::new(FailingRerank),
    );

    let state = SessionState::new("why are requests timing out", evidence, "", 2);
    let final_state = controller.run(state).await.expect("terminates cleanly");

    assert!(final_state.reranked_docs.len() <= 5);
    assert!(!final_state.reranked_docs.is_empty());
    for pair in final_state.reranked_docs.windows(2) {
        assert!(pair[0].fusion_score >= pair[1].fusion_score);
    }
    assert!(final_state.generation.is_some());
}

#[tokio::test]
async fn namespace_sessions_attach_structured_alerts() {
    let alert_json = r#"{"alert_name":"VolumeMountFailure","severity":"critical","rca":"disk error during mount","diagnostic_commands":"oc describe pod web-1 -n prod"}"#;

    // Grading first (three docs -> yes/yes/no is irrelevant here, keep
    // all), then the answer, then the alert payload
    let chat = Arc::new(StubChat::scripted(
        vec![
            "yes".to_string(),
            "yes".to_string(),
            "yes".to_string(),
            "ISSUE: disk error during mount".to_string(),
            alert_json.to_string(),
        ],
        "yes",
    ));
    let controller = controller(
        chat,
        Arc::new(StubEmbedding::default()),
        Arc::new(StubRerank),
    );

    let state = SessionState::new("why did the mount fail", EVIDENCE, "", 2)
        .with_scope(Some("prod".to_string()), Some("web-1".to_string()));
    let final_state = controller.run(state).await.expect("terminates cleanly");

    let alert = final_state.alert.expect("alert attached");
    assert_eq!(alert.payload.alerts[0].labels["alertname"], "VolumeMountFailure");
    assert_eq!(alert.payload.alerts[0].labels["namespace"], "prod");
    assert_eq!(alert.rca, "disk error during mount");
}
