//! Hindi→English translation via an upstream inference endpoint.
//!
//! The seq2seq model itself is an external collaborator; its only
//! contract here is "text in, translated text out". The production
//! implementation fronts an HTTP endpoint speaking the same
//! `{"text"} -> {"translation"}` shape this service exposes.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("translation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected upstream response: {0}")]
    BadResponse(String),
}

/// Narrow capability seam for translation, stubbed in tests.
pub trait Translator: Send + Sync {
    fn translate(&self, text: &str) -> Result<String, TranslateError>;
}

#[derive(Serialize)]
struct UpstreamRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct UpstreamResponse {
    #[serde(default)]
    translation: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Translator backed by a blocking HTTP client.
pub struct HttpTranslator {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpTranslator {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, TranslateError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

impl Translator for HttpTranslator {
    fn translate(&self, text: &str) -> Result<String, TranslateError> {
        let response = self
            .client
            .post(&self.url)
            .json(&UpstreamRequest { text })
            .send()?
            .error_for_status()?
            .json::<UpstreamResponse>()?;

        if let Some(error) = response.error {
            return Err(TranslateError::BadResponse(error));
        }

        response
            .translation
            .ok_or_else(|| TranslateError::BadResponse("missing 'translation' field".to_string()))
    }
}
