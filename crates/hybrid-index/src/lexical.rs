use logscout_log_chunker::LogChunk;
use std::collections::{HashMap, HashSet};

const DEFAULT_K1: f32 = 1.2;
const DEFAULT_B: f32 = 0.75;

/// In-memory BM25 term-frequency index over a session's chunk set.
///
/// Built fresh per question and discarded with the session; no external
/// dependency and no shared state across builds.
pub struct LexicalIndex {
    docs: Vec<Vec<String>>,
    doc_freq: HashMap<String, usize>,
    avg_len: f32,
    k1: f32,
    b: f32,
}

impl LexicalIndex {
    /// Build the index over the given chunks. Chunk order defines the
    /// document ids used in query results.
    pub fn build(chunks: &[LogChunk]) -> Self {
        let mut docs = Vec::with_capacity(chunks.len());
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        let mut total_len = 0usize;

        for chunk in chunks {
            let tokens = tokenize(&chunk.content);
            total_len += tokens.len();

            let mut seen = HashSet::new();
            for token in &tokens {
                if seen.insert(token.as_str()) {
                    *doc_freq.entry(token.clone()).or_insert(0) += 1;
                }
            }
            docs.push(tokens);
        }

        let doc_count = docs.len().max(1);
        let avg_len = (total_len as f32) / doc_count as f32;

        log::debug!(
            "Built lexical index: {} docs, {} distinct terms",
            docs.len(),
            doc_freq.len()
        );

        Self {
            docs,
            doc_freq,
            avg_len,
            k1: DEFAULT_K1,
            b: DEFAULT_B,
        }
    }

    /// Rank all documents against the query.
    /// Returns (doc_index, score) with positive scores only, sorted by
    /// score descending; ties break on document index so identical input
    /// always produces identical output.
    pub fn query(&self, query: &str, k: usize) -> Vec<(usize, f32)> {
        let query_tokens = tokenize(query);
        if query_tokens.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f32)> = self
            .docs
            .iter()
            .enumerate()
            .filter_map(|(idx, _)| {
                let score = self.score(idx, &query_tokens);
                (score > 0.0).then_some((idx, score))
            })
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        scored.truncate(k);
        scored
    }

    fn score(&self, idx: usize, query_tokens: &[String]) -> f32 {
        let Some(doc_tokens) = self.docs.get(idx) else {
            return 0.0;
        };
        if doc_tokens.is_empty() {
            return 0.0;
        }

        let dl = doc_tokens.len() as f32;
        let total_docs = self.docs.len().max(1) as f32;
        let mut score = 0.0;

        for token in query_tokens {
            let freq = term_frequency(doc_tokens, token);
            if freq <= 0.0 {
                continue;
            }
            let df = *self.doc_freq.get(token).unwrap_or(&0) as f32;
            let idf = bm25_idf(total_docs, df);
            let denom =
                freq + self.k1 * (1.0 - self.b + self.b * dl / self.avg_len.max(1e-3));
            if denom > 0.0 {
                score += idf * (freq * (self.k1 + 1.0)) / denom;
            }
        }

        score
    }

    /// Number of indexed documents
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

/// ASCII-alphanumeric tokenization, lowercased, minimum token length 3
fn tokenize(content: &str) -> Vec<String> {
    content
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter_map(|part| {
            let normalized = part.to_ascii_lowercase();
            (normalized.len() >= 3).then_some(normalized)
        })
        .collect()
}

fn term_frequency(doc_tokens: &[String], needle: &str) -> f32 {
    doc_tokens
        .iter()
        .filter(|token| token.as_str() == needle)
        .count() as f32
}

fn bm25_idf(total_docs: f32, df: f32) -> f32 {
    ((total_docs - df + 0.5) / (df + 0.5) + 1.0).ln()
}
