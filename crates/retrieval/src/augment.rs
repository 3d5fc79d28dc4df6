/// Scope identifiers attached to a session's question
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    /// Pod under investigation, when the evidence is an orchestrated
    /// workload
    pub pod_name: Option<String>,

    /// Namespace of the workload; absent for infrastructure devices
    pub namespace: Option<String>,
}

/// Error indicators in descending priority; only the first match is
/// appended so one dominant symptom does not dilute the query.
const ERROR_KEYWORDS: &[&str] = &[
    "error",
    "failed",
    "crash",
    "oom",
    "timeout",
    "backoff",
    "terminated",
    "killed",
    "unavailable",
];

/// Resource-reference indicators; each detected keyword is appended once.
/// The patterns include the punctuated spellings that appear in pod
/// descriptions, the keyword is the plain search term.
const RESOURCE_KEYWORDS: &[(&str, &str)] = &[
    ("secret", "secret"),
    ("configmap", "configmap"),
    ("environment:", "environment"),
    ("volumes:", "volume"),
    ("mountvolume", "mount"),
];

/// Builds the enhanced query that both indexes are searched with:
/// the raw question plus structured hints extracted from the session
/// context and the evidence text itself.
#[derive(Debug, Default)]
pub struct QueryAugmenter;

impl QueryAugmenter {
    pub fn new() -> Self {
        Self
    }

    /// Concatenate the question with pod/namespace hints, at most one
    /// error keyword, and any detected resource keywords. Each hint is
    /// appended at most once.
    pub fn augment(&self, question: &str, ctx: &QueryContext, evidence: &str) -> String {
        let mut parts: Vec<String> = vec![question.to_string()];

        if let Some(pod) = ctx.pod_name.as_deref().filter(|p| !p.is_empty()) {
            push_unique(&mut parts, format!("pod:{pod}"));
        }
        if let Some(namespace) = ctx.namespace.as_deref().filter(|n| !n.is_empty()) {
            push_unique(&mut parts, format!("namespace:{namespace}"));
        }

        let evidence_lower = evidence.to_ascii_lowercase();

        for keyword in ERROR_KEYWORDS {
            if evidence_lower.contains(keyword) {
                push_unique(&mut parts, (*keyword).to_string());
                break;
            }
        }

        for (pattern, keyword) in RESOURCE_KEYWORDS {
            if evidence_lower.contains(pattern) {
                push_unique(&mut parts, (*keyword).to_string());
            }
        }

        let augmented = parts.join(" ");
        if augmented != question {
            log::debug!("Augmented query: '{question}' -> '{augmented}'");
        }
        augmented
    }
}

fn push_unique(parts: &mut Vec<String>, hint: String) {
    if !parts.contains(&hint) {
        parts.push(hint);
    }
}
