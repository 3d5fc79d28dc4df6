use crate::types::RetrievalMethod;
use std::collections::HashMap;

/// RRF rank constant (conventional value)
pub const RRF_K: f32 = 60.0;

/// One fused candidate: chunk index, fused score, and which rankings
/// contained it
#[derive(Debug, Clone, PartialEq)]
pub struct FusedHit {
    pub idx: usize,
    pub score: f32,
    pub method: RetrievalMethod,
}

/// Reciprocal-rank fusion of the lexical and dense rankings.
///
/// Each chunk's fused score is the sum of `1 / (rank + k)` over the
/// rankings that contain it (ranks are 1-based); chunks absent from a
/// ranking contribute nothing from it. Ties break on lexical rank, then
/// dense rank, so a fixed pair of input orderings always produces the
/// identical fused order.
///
/// Pure function over two ordered lists, no I/O and no hidden state.
pub fn rrf_fuse(
    lexical: &[(usize, f32)],
    dense: &[(usize, f32)],
    k_const: f32,
) -> Vec<FusedHit> {
    let lexical_ranks: HashMap<usize, usize> = lexical
        .iter()
        .enumerate()
        .map(|(rank, (idx, _))| (*idx, rank + 1))
        .collect();
    let dense_ranks: HashMap<usize, usize> = dense
        .iter()
        .enumerate()
        .map(|(rank, (idx, _))| (*idx, rank + 1))
        .collect();

    let mut scores: HashMap<usize, f32> = HashMap::new();
    for (idx, rank) in &lexical_ranks {
        *scores.entry(*idx).or_insert(0.0) += 1.0 / (*rank as f32 + k_const);
    }
    for (idx, rank) in &dense_ranks {
        *scores.entry(*idx).or_insert(0.0) += 1.0 / (*rank as f32 + k_const);
    }

    let mut fused: Vec<FusedHit> = scores
        .into_iter()
        .map(|(idx, score)| {
            let method = match (lexical_ranks.contains_key(&idx), dense_ranks.contains_key(&idx)) {
                (true, true) => RetrievalMethod::Fused,
                (true, false) => RetrievalMethod::Lexical,
                (false, _) => RetrievalMethod::Dense,
            };
            FusedHit { idx, score, method }
        })
        .collect();

    fused.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| rank_or_max(&lexical_ranks, a.idx).cmp(&rank_or_max(&lexical_ranks, b.idx)))
            .then_with(|| rank_or_max(&dense_ranks, a.idx).cmp(&rank_or_max(&dense_ranks, b.idx)))
    });

    fused
}

fn rank_or_max(ranks: &HashMap<usize, usize>, idx: usize) -> usize {
    ranks.get(&idx).copied().unwrap_or(usize::MAX)
}
