use crate::config::SplitterConfig;
use crate::error::{Result, SplitterError};
use crate::types::{ChunkMetadata, LogChunk, SourceKind};
use once_cell::sync::Lazy;
use regex::Regex;

/// Delimiter used when appending an event block to pod logs
pub const EVENTS_SECTION_HEADER: &str = "=== Pod Events ===";

/// Matches section delimiters such as `=== Pod Events ===`
static SECTION_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*={3,}\s*(.+?)\s*={3,}\s*$").expect("valid section regex"));

/// Combine raw logs and an optional event block into one evidence text.
/// The event block is appended under a delimited section header so the
/// splitter can attribute provenance.
pub fn combine_evidence(log_context: &str, pod_events: &str) -> String {
    if pod_events.trim().is_empty() {
        return log_context.to_string();
    }
    format!("{log_context}\n\n{EVENTS_SECTION_HEADER}\n{pod_events}")
}

/// Deterministic splitter for raw log/event text.
///
/// Splitting is purely boundary-driven: a section delimiter opens a new
/// section, blank lines separate paragraphs, and paragraphs longer than
/// the configured window are cut into fixed-size line windows. Identical
/// input always yields identical chunk boundaries.
pub struct Splitter {
    config: SplitterConfig,
}

impl Splitter {
    /// Create a new splitter with configuration
    pub fn new(config: SplitterConfig) -> Result<Self> {
        config
            .validate()
            .map_err(SplitterError::invalid_config)?;
        Ok(Self { config })
    }

    /// Split evidence text into chunks.
    /// Empty input yields an empty vec, not an error.
    pub fn split(&self, text: &str) -> Vec<LogChunk> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut chunks = Vec::new();
        let mut section: Option<String> = None;
        let mut paragraph: Vec<(usize, &str)> = Vec::new();

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;

            if let Some(caps) = SECTION_HEADER.captures(line) {
                self.flush_paragraph(&mut paragraph, section.as_deref(), &mut chunks);
                section = Some(caps[1].to_string());
                continue;
            }

            if line.trim().is_empty() {
                self.flush_paragraph(&mut paragraph, section.as_deref(), &mut chunks);
                continue;
            }

            paragraph.push((line_no, line));
        }
        self.flush_paragraph(&mut paragraph, section.as_deref(), &mut chunks);

        self.merge_short_chunks(chunks)
    }

    /// Emit the buffered paragraph as one or more windowed chunks
    fn flush_paragraph(
        &self,
        paragraph: &mut Vec<(usize, &str)>,
        section: Option<&str>,
        chunks: &mut Vec<LogChunk>,
    ) {
        if paragraph.is_empty() {
            return;
        }

        let lines = std::mem::take(paragraph);
        for window in lines.chunks(self.config.max_chunk_lines) {
            let start_line = window[0].0;
            let end_line = window[window.len() - 1].0;
            let content = window
                .iter()
                .map(|(_, line)| *line)
                .collect::<Vec<_>>()
                .join("\n");

            chunks.push(LogChunk::new(
                section.unwrap_or("logs").to_string(),
                start_line,
                end_line,
                content,
                self.metadata_for(section),
            ));
        }
    }

    fn metadata_for(&self, section: Option<&str>) -> ChunkMetadata {
        let source_kind = match section {
            Some(name) if name.to_ascii_lowercase().contains("event") => SourceKind::EventStream,
            Some(_) | None => SourceKind::PodLog,
        };
        let mut metadata = ChunkMetadata::default().source_kind(source_kind);
        metadata.section = section.map(str::to_string);
        metadata
    }

    /// Fold chunks below the minimum size into their predecessor so that
    /// one-line fragments do not dilute retrieval
    fn merge_short_chunks(&self, chunks: Vec<LogChunk>) -> Vec<LogChunk> {
        let mut merged: Vec<LogChunk> = Vec::with_capacity(chunks.len());

        for chunk in chunks {
            let too_short = chunk.content.len() < self.config.min_chunk_chars;
            match merged.last_mut() {
                Some(prev) if too_short && prev.metadata.section == chunk.metadata.section => {
                    prev.content.push('\n');
                    prev.content.push_str(&chunk.content);
                    prev.end_line = chunk.end_line;
                }
                _ => merged.push(chunk),
            }
        }

        log::debug!("Split evidence into {} chunks", merged.len());
        merged
    }
}

impl Default for Splitter {
    fn default() -> Self {
        Self {
            config: SplitterConfig::default(),
        }
    }
}
