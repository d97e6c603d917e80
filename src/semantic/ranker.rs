//! Semantic product ranking.
//!
//! Ranks catalog items against a free-text query by cosine similarity of
//! their embeddings, with a flat additive boost for tag matches, then
//! deduplicates by product name.

use std::collections::HashSet;

use crate::catalog::CatalogItem;
use crate::semantic::embeddings::{EmbeddingError, TextEmbedder};
use crate::semantic::similarity::cosine_similarity;

/// Ranking knobs, sourced from config at construction time.
#[derive(Debug, Clone)]
pub struct RankOpts {
    /// Maximum number of unique-named items to return.
    pub limit: usize,

    /// Flat score bonus when any item tag appears in the query.
    /// A re-ranking heuristic, not a probability: boosted scores may
    /// exceed 1.0 and are never clamped.
    pub tag_boost: f32,
}

impl Default for RankOpts {
    fn default() -> Self {
        Self {
            limit: 5,
            tag_boost: 0.2,
        }
    }
}

/// Rank `items` against `query` and return up to `opts.limit` unique-named
/// items, best first.
///
/// An empty or whitespace query short-circuits to an empty list without
/// touching the model. Two model invocations otherwise: one batched call
/// for all passages, one for the "query: "-prefixed query.
pub fn rank_products(
    embedder: &dyn TextEmbedder,
    query: &str,
    items: &[CatalogItem],
    opts: &RankOpts,
) -> Result<Vec<CatalogItem>, EmbeddingError> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(vec![]);
    }

    let passages: Vec<String> = items.iter().map(|item| item.passage_text()).collect();
    let item_embeddings = embedder.embed_batch(&passages)?;
    let query_embedding = embedder.embed(&format!("query: {query}"))?;

    let mut scores: Vec<f32> = item_embeddings
        .iter()
        .map(|emb| cosine_similarity(emb, &query_embedding))
        .collect();

    // tag-match boost
    let query_lower = query.to_lowercase();
    for (idx, item) in items.iter().enumerate() {
        if item
            .tags
            .iter()
            .any(|tag| query_lower.contains(&tag.to_lowercase()))
        {
            scores[idx] += opts.tag_boost;
        }
    }

    // Stable sort over the full index range, so catalog order breaks ties.
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    if log::log_enabled!(log::Level::Debug) {
        for &idx in order.iter().take(10) {
            log::debug!(
                "suggestion candidate: {} | score: {:.4} | tags: {:?}",
                items[idx].name,
                scores[idx],
                items[idx].tags
            );
        }
    }

    // Dedup by name. Unnamed items are never counted and never returned.
    let mut seen: HashSet<&str> = HashSet::new();
    let mut results = Vec::new();
    for idx in order {
        let name = items[idx].name.as_str();
        if name.is_empty() || !seen.insert(name) {
            continue;
        }
        results.push(items[idx].clone());
        if results.len() == opts.limit {
            break;
        }
    }

    Ok(results)
}
