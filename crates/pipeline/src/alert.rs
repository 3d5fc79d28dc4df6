use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Severity tier of a structured alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    /// Get human-readable name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

/// The fields the extraction call asks the model for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedAlert {
    /// Classification label, e.g. "ConfigMapMissing"
    pub alert_name: String,

    /// Severity tier
    pub severity: Severity,

    /// Root-cause narrative
    pub rca: String,

    /// Commands for diagnosing the issue
    #[serde(default)]
    pub diagnostic_commands: Option<String>,
}

/// Alert metadata block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertMeta {
    pub endpoint: String,
    pub received_at: String,
    pub source: AlertSource,
}

/// Origin of the alert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertSource {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub uuid: String,
}

/// One alert record in the payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogAlert {
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
    pub starts_at: String,
    pub ends_at: String,
    #[serde(rename = "generatorURL")]
    pub generator_url: String,
}

/// Payload in the shape downstream automation consumes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertPayload {
    pub alerts: Vec<LogAlert>,
    pub common_labels: BTreeMap<String, String>,
    pub common_annotations: BTreeMap<String, String>,
    #[serde(rename = "externalURL")]
    pub external_url: String,
    pub group_key: String,
    pub receiver: String,
    pub status: String,
    pub version: String,
}

/// Complete structured alert handed to the alert consumer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertEnvelope {
    pub meta: AlertMeta,
    pub payload: AlertPayload,
    pub rca: String,
    #[serde(default)]
    pub diagnostic_commands: Option<String>,
}

const SOURCE_NAME: &str = "logscout";
const STILL_FIRING: &str = "0001-01-01T00:00:00Z";

/// Parse the model's extraction response, tolerating markdown code fences
pub fn parse_alert_response(text: &str) -> serde_json::Result<ExtractedAlert> {
    serde_json::from_str(strip_code_fences(text))
}

fn strip_code_fences(text: &str) -> &str {
    for fence in ["```json", "```"] {
        if let Some(start) = text.find(fence) {
            let rest = &text[start + fence.len()..];
            let body = match rest.find("```") {
                Some(end) => &rest[..end],
                None => rest,
            };
            return body.trim();
        }
    }
    text.trim()
}

/// Wrap an extracted alert into the full consumer envelope
pub fn build_envelope(
    extracted: ExtractedAlert,
    namespace: &str,
    pod_name: Option<&str>,
    question: &str,
) -> AlertEnvelope {
    let timestamp = Utc::now().to_rfc3339();
    let instance = match pod_name {
        Some(pod) if !pod.is_empty() => format!("{namespace}/{pod}"),
        _ => namespace.to_string(),
    };

    let mut labels = BTreeMap::new();
    labels.insert("alertname".to_string(), extracted.alert_name.clone());
    labels.insert("instance".to_string(), instance);
    labels.insert("namespace".to_string(), namespace.to_string());
    labels.insert(
        "pod_name".to_string(),
        pod_name.unwrap_or_default().to_string(),
    );
    labels.insert(
        "severity".to_string(),
        extracted.severity.as_str().to_string(),
    );

    let mut annotations = BTreeMap::new();
    annotations.insert(
        "summary".to_string(),
        format!("{} in {namespace}", extracted.alert_name),
    );
    annotations.insert("description".to_string(), question.to_string());

    let mut common_labels = BTreeMap::new();
    common_labels.insert("alertname".to_string(), extracted.alert_name.clone());
    common_labels.insert("namespace".to_string(), namespace.to_string());
    common_labels.insert(
        "severity".to_string(),
        extracted.severity.as_str().to_string(),
    );

    let mut common_annotations = BTreeMap::new();
    common_annotations.insert(
        "summary".to_string(),
        format!("{} in {namespace}", extracted.alert_name),
    );

    AlertEnvelope {
        meta: AlertMeta {
            endpoint: "alerts".to_string(),
            received_at: timestamp.clone(),
            source: AlertSource {
                name: SOURCE_NAME.to_string(),
                kind: "log_analysis".to_string(),
                uuid: Uuid::new_v4().to_string(),
            },
        },
        payload: AlertPayload {
            alerts: vec![LogAlert {
                labels,
                annotations,
                starts_at: timestamp,
                ends_at: STILL_FIRING.to_string(),
                generator_url: format!("http://{SOURCE_NAME}/logs?namespace={namespace}"),
            }],
            common_labels,
            common_annotations,
            external_url: format!("http://{SOURCE_NAME}"),
            group_key: format!("alertname:{}", extracted.alert_name),
            receiver: "automation".to_string(),
            status: "firing".to_string(),
            version: "4".to_string(),
        },
        rca: extracted.rca,
        diagnostic_commands: extracted.diagnostic_commands,
    }
}
