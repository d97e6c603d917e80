//! Nudge theme matching.
//!
//! A fixed process-wide list of themes, each described by a handful of
//! keywords. A conversation summary is matched against the themes by
//! embedding similarity; the winning theme's nudge message is returned
//! only above a similarity threshold.

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::semantic::embeddings::{EmbeddingError, TextEmbedder};
use crate::semantic::similarity::cosine_similarity;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub keywords: Vec<String>,
    pub nudge: String,
}

impl Theme {
    fn new(name: &str, keywords: &[&str], nudge: &str) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            nudge: nudge.to_string(),
        }
    }

    /// Text embedded for this theme: keywords joined with spaces.
    pub fn keyword_text(&self) -> String {
        self.keywords.join(" ")
    }
}

/// The fixed theme list. Loaded once, read-only for the process lifetime.
pub static NUDGE_THEMES: Lazy<Vec<Theme>> = Lazy::new(|| {
    vec![
        Theme::new(
            "travel",
            &["travel", "trip", "flight", "adventure", "backpack"],
            "Looks like your group is planning a trip! Want to see travel combos?",
        ),
        Theme::new(
            "saree",
            &["saree", "lehenga", "dupatta", "ethnic"],
            "You’ve added several sarees! Would you like to see matching accessories?",
        ),
        Theme::new(
            "accessory",
            &["bangles", "jewelry", "accessory", "earring", "necklace"],
            "Accessories complete the look! Want to see trending jewelry?",
        ),
        Theme::new(
            "electronics",
            &["electronics", "gadget", "tech", "phone", "laptop"],
            "Tech shopping spree! Want to see the latest deals on electronics?",
        ),
    ]
});

/// Result of matching a summary against the theme list.
/// Serializes directly as the `/nudge_theme` response body.
#[derive(Debug, Clone, Serialize)]
pub struct ThemeMatch {
    pub theme: Option<String>,
    pub similarity: f32,
    pub nudge: Option<String>,
}

impl ThemeMatch {
    /// The well-defined empty-input response.
    pub fn none() -> Self {
        Self {
            theme: None,
            similarity: 0.0,
            nudge: None,
        }
    }
}

/// Match `summary` against `themes`.
///
/// Empty or whitespace summaries return [`ThemeMatch::none`] without a
/// model call. Otherwise the summary and every theme text are embedded in
/// one batched invocation. Ties go to the earlier theme in the list.
pub fn match_theme(
    embedder: &dyn TextEmbedder,
    summary: &str,
    themes: &[Theme],
    nudge_threshold: f32,
) -> Result<ThemeMatch, EmbeddingError> {
    let summary = summary.trim();
    if summary.is_empty() || themes.is_empty() {
        return Ok(ThemeMatch::none());
    }

    let mut texts = Vec::with_capacity(themes.len() + 1);
    texts.push(summary.to_string());
    texts.extend(themes.iter().map(|theme| theme.keyword_text()));

    let embeddings = embedder.embed_batch(&texts)?;
    let (summary_emb, theme_embs) = embeddings
        .split_first()
        .ok_or_else(|| EmbeddingError::Inference("no embeddings returned".to_string()))?;

    // stable argmax: strictly-greater keeps the first theme on ties
    let mut best_idx = 0;
    let mut best_sim = f32::NEG_INFINITY;
    for (idx, emb) in theme_embs.iter().enumerate() {
        let sim = cosine_similarity(emb, summary_emb);
        if sim > best_sim {
            best_sim = sim;
            best_idx = idx;
        }
    }

    let best = &themes[best_idx];
    log::debug!(
        "nudge theme: summary='{summary}' | best_theme='{}' | similarity={best_sim:.3}",
        best.name
    );

    Ok(ThemeMatch {
        theme: Some(best.name.clone()),
        similarity: best_sim,
        nudge: (best_sim >= nudge_threshold).then(|| best.nudge.clone()),
    })
}
