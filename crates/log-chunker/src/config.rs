use serde::{Deserialize, Serialize};

/// Configuration for log splitting behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitterConfig {
    /// Maximum lines per chunk; longer paragraphs are windowed
    pub max_chunk_lines: usize,

    /// Chunks shorter than this many characters are merged into the
    /// previous chunk of the same section
    pub min_chunk_chars: usize,

    /// Keep sections that contain only blank lines
    pub keep_blank_sections: bool,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            max_chunk_lines: 40,
            min_chunk_chars: 24,
            keep_blank_sections: false,
        }
    }
}

impl SplitterConfig {
    /// Config tuned for event streams (short, dense records)
    pub fn for_events() -> Self {
        Self {
            max_chunk_lines: 20,
            min_chunk_chars: 12,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_chunk_lines == 0 {
            return Err("max_chunk_lines must be at least 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SplitterConfig::default().validate().is_ok());
        assert!(SplitterConfig::for_events().validate().is_ok());
    }

    #[test]
    fn test_zero_window_rejected() {
        let config = SplitterConfig {
            max_chunk_lines: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
