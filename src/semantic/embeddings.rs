//! Local embedding inference via fastembed.
//!
//! The model is downloaded on first use and cached under the data
//! directory. fastembed's `embed()` takes `&mut self`, so calls are
//! serialized through a `Mutex` at the invocation boundary.

use fastembed::{InitOptions, TextEmbedding};
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("model initialization failed: {0}")]
    InitFailed(String),

    #[error("unknown embedding model: {0}")]
    UnknownModel(String),

    #[error("embedding inference failed: {0}")]
    Inference(String),
}

/// Narrow capability seam for embedding generation.
///
/// Ranking and theme matching only ever need "strings in, vectors out",
/// which keeps them unit-testable with a deterministic stub.
pub trait TextEmbedder: Send + Sync {
    /// Embed a batch of texts in a single model invocation.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Embed a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_batch(&[text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::Inference("no embedding returned".to_string()))
    }
}

/// Production embedder backed by a fastembed model.
pub struct LocalEmbedder {
    model: Mutex<TextEmbedding>,
    dimensions: usize,
}

impl LocalEmbedder {
    /// Load the named model, downloading it into `cache_dir/models` when
    /// not cached yet. Fails fast on unknown model names so a typo in the
    /// config is caught at startup, not on the first request.
    pub fn init(model_name: &str, cache_dir: PathBuf) -> Result<Self, EmbeddingError> {
        let model_enum = parse_model_name(model_name)?;

        let models_dir = cache_dir.join("models");
        std::fs::create_dir_all(&models_dir)
            .map_err(|err| EmbeddingError::InitFailed(format!("create {models_dir:?}: {err}")))?;

        let options = InitOptions::new(model_enum)
            .with_cache_dir(models_dir)
            .with_show_download_progress(true);

        let mut model = TextEmbedding::try_new(options)
            .map_err(|err| EmbeddingError::InitFailed(err.to_string()))?;

        // one throwaway inference: warms the model up and tells us the
        // vector width
        let dimensions = model
            .embed(vec!["warmup"], None)
            .map_err(|err| EmbeddingError::InitFailed(err.to_string()))?
            .first()
            .map(|v| v.len())
            .ok_or_else(|| EmbeddingError::InitFailed("model returned no embedding".to_string()))?;

        log::info!("embedding model '{model_name}' ready ({dimensions} dims)");

        Ok(Self {
            model: Mutex::new(model),
            dimensions,
        })
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

impl TextEmbedder for LocalEmbedder {
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let mut model = self
            .model
            .lock()
            .map_err(|err| EmbeddingError::Inference(format!("model lock poisoned: {err}")))?;

        model
            .embed(texts.to_vec(), None)
            .map_err(|err| EmbeddingError::Inference(err.to_string()))
    }
}

/// Map a config-supplied model name onto the fastembed enum.
fn parse_model_name(name: &str) -> Result<fastembed::EmbeddingModel, EmbeddingError> {
    match name.to_lowercase().as_str() {
        "all-minilm-l6-v2" => Ok(fastembed::EmbeddingModel::AllMiniLML6V2),
        "all-minilm-l6-v2-q" => Ok(fastembed::EmbeddingModel::AllMiniLML6V2Q),
        "bge-small-en-v1.5" => Ok(fastembed::EmbeddingModel::BGESmallENV15),
        "bge-small-en-v1.5-q" => Ok(fastembed::EmbeddingModel::BGESmallENV15Q),
        "bge-base-en-v1.5" => Ok(fastembed::EmbeddingModel::BGEBaseENV15),
        "bge-base-en-v1.5-q" => Ok(fastembed::EmbeddingModel::BGEBaseENV15Q),
        "bge-large-en-v1.5" => Ok(fastembed::EmbeddingModel::BGELargeENV15),
        "bge-large-en-v1.5-q" => Ok(fastembed::EmbeddingModel::BGELargeENV15Q),
        _ => Err(EmbeddingError::UnknownModel(format!(
            "{name}. Supported: all-MiniLM-L6-v2, bge-small-en-v1.5, bge-base-en-v1.5, \
             bge-large-en-v1.5 (-q suffix for quantized)"
        ))),
    }
}
