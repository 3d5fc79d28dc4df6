//! Prompt builders for the model-facing nodes.
//!
//! All answer content must stay grounded in the supplied snippets, and the
//! remediation vocabulary routes on whether the session has an
//! orchestration namespace. Both are enforced here, through prompt content,
//! not through code branches in the nodes.

use logscout_retrieval::RankedChunk;

/// Marker the answer model opens with when the evidence cannot support an
/// answer; the controller treats it as a request to rewrite the query
pub const INSUFFICIENT_MARKER: &str = "INSUFFICIENT EVIDENCE";

/// Per-document relevance classification (inclusive bias: partial
/// relevance counts as relevant)
pub fn grading_prompt(question: &str, document: &str) -> String {
    format!(
        "You are a relevance evaluator for infrastructure log troubleshooting.\n\
         \n\
         Even PARTIAL relevance counts as 'yes': missing context is worse than\n\
         including a borderline document. Configuration details (secrets,\n\
         config maps, volumes, environment variables) are relevant even without\n\
         explicit errors.\n\
         \n\
         Question: {question}\n\
         \n\
         Log document:\n\
         {document}\n\
         \n\
         Criteria:\n\
         - Error messages, warnings, failures -> yes\n\
         - Resource references (secrets, config maps, volumes, mounts) -> yes\n\
         - Pod status, conditions, or events -> yes\n\
         - Only completely unrelated information -> no\n\
         \n\
         Is this document relevant? Respond only with 'yes' or 'no'."
    )
}

/// Scope line injected into the answer prompts; routes the remediation
/// vocabulary between orchestrated workloads and infrastructure devices
pub fn component_context(namespace: Option<&str>, pod_name: Option<&str>) -> String {
    match namespace.filter(|n| !n.is_empty()) {
        Some(namespace) => format!(
            "Component type: orchestrated pod workload\n\
             Namespace: {namespace}\n\
             Pod: {}",
            pod_name.filter(|p| !p.is_empty()).unwrap_or("all pods in namespace")
        ),
        None => "Component type: infrastructure device (database, storage, server, or firewall)\n\
                 Note: this is NOT an orchestrated workload. Do not suggest 'oc' or\n\
                 'kubectl' commands; use the device's own admin tooling or recommend\n\
                 contacting the responsible administrator."
            .to_string(),
    }
}

/// System prompt for the grounded answer call
pub fn answer_system_prompt(namespace: Option<&str>) -> String {
    let remediation = match namespace.filter(|n| !n.is_empty()) {
        Some(namespace) => format!(
            "Resolution commands: use 'oc' exclusively (not kubectl), and include\n\
             '-n {namespace}' in every command. Valid patterns: oc get/describe/logs,\n\
             oc delete pod, oc rollout restart deployment/<name>, oc scale,\n\
             oc create configmap/secret. There is no 'oc restart'."
        ),
        None => "Resolution commands: use the component's own admin tooling (database\n\
                 CLI, systemctl, vendor CLI) or recommend escalation to the responsible\n\
                 administrator. Never suggest orchestrator commands."
            .to_string(),
    };

    format!(
        "You are an expert operations engineer analyzing infrastructure logs.\n\
         \n\
         Strict grounding rules:\n\
         1. Use ONLY information explicitly present in the supplied log snippets.\n\
         2. Do not invent error codes, component types, or technologies.\n\
         3. If logs show only INFO/DEBUG, the system is healthy; say so.\n\
         4. If the snippets cannot answer the question, begin your reply with\n\
            '{INSUFFICIENT_MARKER}:' and state what is missing.\n\
         \n\
         {remediation}\n\
         \n\
         Answer in this format, each section on its own line with a blank line\n\
         between sections:\n\
         \n\
         ISSUE: all real issues found, each listed separately\n\
         \n\
         ROOT CAUSE: explanation based on the actual error evidence\n\
         \n\
         IMMEDIATE ACTIONS: only if real issues exist\n\
         \n\
         RESOLUTION: only if real issues exist, commands in ```bash blocks\n\
         \n\
         Maximum 300 words. Be honest if no issues exist."
    )
}

/// User prompt for the grounded answer call
pub fn answer_user_prompt(component_context: &str, question: &str, evidence: &str) -> String {
    format!(
        "Analyze these infrastructure logs:\n\
         \n\
         {component_context}\n\
         Question: {question}\n\
         \n\
         Log evidence:\n\
         {evidence}\n\
         \n\
         Answer in the specified format. Reference only information present in\n\
         the evidence above."
    )
}

/// Evidence block with per-snippet scores, in rerank order
pub fn evidence_block(docs: &[RankedChunk]) -> String {
    docs.iter()
        .enumerate()
        .map(|(i, doc)| {
            format!(
                "Log snippet {} (score {:.3}):\n{}\n",
                i + 1,
                doc.rerank_score,
                doc.chunk.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// System prompt for the structured alert extraction call
pub fn alert_system_prompt(namespace: &str, pod_name: Option<&str>) -> String {
    format!(
        "You generate structured alerts for orchestrated workload issues.\n\
         \n\
         Context:\n\
         - Namespace: {namespace}\n\
         - Pod: {}\n\
         \n\
         Respond with a single JSON object and nothing else:\n\
         {{\n\
           \"alert_name\": \"ConfigMapMissing\",\n\
           \"severity\": \"critical\",\n\
           \"rca\": \"detailed root cause analysis\",\n\
           \"diagnostic_commands\": \"oc get cm <name> -n {namespace}\"\n\
         }}\n\
         \n\
         Rules: use only information from the log evidence; severity is one of\n\
         critical, warning, info; include '-n {namespace}' in every command; use\n\
         actual resource names from the logs.",
        pod_name.filter(|p| !p.is_empty()).unwrap_or("unknown")
    )
}

/// User prompt for the structured alert extraction call
pub fn alert_user_prompt(question: &str, evidence: &str) -> String {
    format!(
        "Create a structured alert for this issue.\n\
         \n\
         Question: {question}\n\
         \n\
         Log evidence:\n\
         {evidence}\n\
         \n\
         Respond with the JSON object only."
    )
}

/// Query rewrite prompt over a bounded preview of the raw evidence
pub fn transform_prompt(question: &str, evidence_preview: &str) -> String {
    format!(
        "You are refining a log analysis query that did not retrieve good\n\
         results.\n\
         \n\
         Original question: {question}\n\
         \n\
         Grounding rules:\n\
         1. Use only information that appears in the log preview below.\n\
         2. Do not invent error codes, status codes, or component names.\n\
         3. Keep the question simple and focused on what the logs contain.\n\
         \n\
         Log preview:\n\
         {evidence_preview}\n\
         \n\
         Rewrite the question to better match the log content. If the logs show\n\
         errors, focus on those error patterns; if they are generic, keep the\n\
         question generic. Return only the rewritten question."
    )
}
