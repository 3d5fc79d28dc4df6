use serde::{Deserialize, Serialize};

/// A retrievable span of log text with provenance metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogChunk {
    /// Section or stream this chunk came from (e.g. "Pod Events")
    pub source: String,

    /// Start line within the combined evidence text (1-indexed)
    pub start_line: usize,

    /// End line (1-indexed, inclusive)
    pub end_line: usize,

    /// The raw log content
    pub content: String,

    /// Provenance metadata
    pub metadata: ChunkMetadata,
}

impl LogChunk {
    /// Create a new log chunk
    #[must_use]
    pub const fn new(
        source: String,
        start_line: usize,
        end_line: usize,
        content: String,
        metadata: ChunkMetadata,
    ) -> Self {
        Self {
            source,
            start_line,
            end_line,
            content,
            metadata,
        }
    }

    /// Get the number of lines in this chunk
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    /// Check if chunk contains a specific line
    #[must_use]
    pub const fn contains_line(&self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }
}

/// Metadata about a log chunk
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkMetadata {
    /// Section header this chunk was found under, if any
    pub section: Option<String>,

    /// What kind of evidence stream produced this chunk
    pub source_kind: SourceKind,

    /// Free-form tags (severity markers, resource names, etc.)
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ChunkMetadata {
    /// Create metadata for a named section
    pub fn with_section(section: impl Into<String>) -> Self {
        Self {
            section: Some(section.into()),
            ..Default::default()
        }
    }

    /// Builder: set source kind
    #[must_use]
    pub const fn source_kind(mut self, kind: SourceKind) -> Self {
        self.source_kind = kind;
        self
    }

    /// Builder: add a tag
    #[must_use]
    pub fn add_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

/// Origin of a chunk's evidence text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Container/pod stdout-stderr log lines
    PodLog,
    /// Orchestrator event stream (scheduling, mounts, probes)
    EventStream,
    /// Non-orchestrated infrastructure device (database, storage, firewall)
    Infrastructure,
    /// Could not be classified
    #[default]
    Unknown,
}

impl SourceKind {
    /// Get human-readable name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PodLog => "pod_log",
            Self::EventStream => "event_stream",
            Self::Infrastructure => "infrastructure",
            Self::Unknown => "unknown",
        }
    }
}
