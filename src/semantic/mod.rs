//! Semantic matching on top of local embeddings.
//!
//! - `embeddings`: fastembed wrapper behind the `TextEmbedder` seam
//! - `similarity`: cosine similarity primitives
//! - `ranker`: product ranking with tag boost and name dedup
//! - `themes`: nudge theme matching

pub mod embeddings;
pub mod ranker;
pub mod similarity;
pub mod themes;

pub use embeddings::{EmbeddingError, LocalEmbedder, TextEmbedder};
pub use ranker::{rank_products, RankOpts};
pub use themes::{match_theme, Theme, ThemeMatch, NUDGE_THEMES};
