//! Application core: the loaded catalog, theme list and model handles,
//! assembled once at startup and injected read-only into request handling.

use std::sync::Arc;
use std::time::Duration;

use crate::catalog::{self, CatalogItem};
use crate::config::Config;
use crate::semantic::{
    match_theme, rank_products, EmbeddingError, LocalEmbedder, RankOpts, TextEmbedder, Theme,
    ThemeMatch, NUDGE_THEMES,
};
use crate::translate::{HttpTranslator, TranslateError, Translator};

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("translation error: {0}")]
    Translate(#[from] TranslateError),
}

pub struct App {
    config: Config,
    catalog: Vec<CatalogItem>,
    themes: Vec<Theme>,
    rank_opts: RankOpts,
    embedder: Arc<dyn TextEmbedder>,
    translator: Arc<dyn Translator>,
}

impl App {
    /// Build the full production app: loads the embedding model (fatal on
    /// failure), the default catalog and the translator client.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let embedder = LocalEmbedder::init(&config.embedding.model, config.data_dir())?;
        let translator = HttpTranslator::new(
            &config.translate.upstream_url,
            Duration::from_secs(config.translate.timeout_secs),
        )?;
        let catalog = catalog::load_or_default(config.base_path())?;

        Ok(Self::with_parts(
            config,
            catalog,
            NUDGE_THEMES.clone(),
            Arc::new(embedder),
            Arc::new(translator),
        ))
    }

    /// Assemble an app from explicit parts. Tests inject stub embedders
    /// and translators here.
    pub fn with_parts(
        config: Config,
        catalog: Vec<CatalogItem>,
        themes: Vec<Theme>,
        embedder: Arc<dyn TextEmbedder>,
        translator: Arc<dyn Translator>,
    ) -> Self {
        let rank_opts = RankOpts {
            limit: config.ranking.suggestion_limit,
            tag_boost: config.ranking.tag_boost,
        };

        Self {
            config,
            catalog,
            themes,
            rank_opts,
            embedder,
            translator,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Rank products against `query`. A non-empty `products` override
    /// replaces the default catalog wholesale for this call.
    pub fn suggest(
        &self,
        query: &str,
        products: Option<Vec<CatalogItem>>,
    ) -> Result<Vec<CatalogItem>, AppError> {
        let items = match &products {
            Some(items) if !items.is_empty() => {
                log::debug!(
                    "using override catalog ({} items), first: {:?}",
                    items.len(),
                    items.iter().take(5).map(|p| &p.name).collect::<Vec<_>>()
                );
                items.as_slice()
            }
            _ => self.catalog.as_slice(),
        };

        rank_products(self.embedder.as_ref(), query, items, &self.rank_opts).map_err(Into::into)
    }

    /// Match a conversation summary against the nudge themes.
    pub fn nudge(&self, summary: &str) -> Result<ThemeMatch, AppError> {
        match_theme(
            self.embedder.as_ref(),
            summary,
            &self.themes,
            self.config.ranking.nudge_threshold,
        )
        .map_err(Into::into)
    }

    /// Translate Hindi text to English. Empty input short-circuits to an
    /// empty translation without touching the upstream.
    pub fn translate(&self, text: &str) -> Result<String, AppError> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        self.translator.translate(text).map_err(Into::into)
    }
}
