use std::sync::Arc;

use crate::app::{App, AppError};
use crate::catalog::CatalogItem;
use crate::config::Config;
use crate::semantic::NUDGE_THEMES;
use crate::tests::stubs::{FailingEmbedder, FailingTranslator, StubEmbedder, StubTranslator};

fn item(name: &str, description: &str, tags: &[&str]) -> CatalogItem {
    CatalogItem {
        name: name.to_string(),
        category: String::new(),
        description: description.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

fn default_catalog() -> Vec<CatalogItem> {
    vec![
        item("Red Saree", "saree", &["saree"]),
        item("Blue Phone", "phone", &["phone"]),
    ]
}

pub fn create_app(
    embedder: Arc<dyn crate::semantic::TextEmbedder>,
    translator: Arc<dyn crate::translate::Translator>,
) -> App {
    App::with_parts(
        Config::default(),
        default_catalog(),
        NUDGE_THEMES.clone(),
        embedder,
        translator,
    )
}

#[test]
fn test_suggest_uses_default_catalog() {
    let app = create_app(
        Arc::new(StubEmbedder::new(&["saree", "phone"])),
        Arc::new(StubTranslator::new("")),
    );

    let results = app.suggest("saree", None).unwrap();
    assert_eq!(results[0].name, "Red Saree");
}

#[test]
fn test_suggest_override_replaces_default_catalog() {
    let app = create_app(
        Arc::new(StubEmbedder::new(&["saree", "phone"])),
        Arc::new(StubTranslator::new("")),
    );

    let override_catalog = vec![item("Green Saree", "saree", &["saree"])];
    let results = app.suggest("saree", Some(override_catalog)).unwrap();

    // full replace, not a merge: nothing from the default catalog leaks in
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Green Saree");
}

#[test]
fn test_suggest_empty_override_falls_back_to_default() {
    let app = create_app(
        Arc::new(StubEmbedder::new(&["saree", "phone"])),
        Arc::new(StubTranslator::new("")),
    );

    let results = app.suggest("saree", Some(vec![])).unwrap();
    assert!(results.iter().any(|p| p.name == "Red Saree"));
}

#[test]
fn test_suggest_embedding_failure_propagates() {
    let app = create_app(Arc::new(FailingEmbedder), Arc::new(StubTranslator::new("")));

    let result = app.suggest("saree", None);
    assert!(matches!(result, Err(AppError::Embedding(_))));
}

#[test]
fn test_nudge_embedding_failure_propagates() {
    let app = create_app(Arc::new(FailingEmbedder), Arc::new(StubTranslator::new("")));

    let result = app.nudge("planning a trip");
    assert!(matches!(result, Err(AppError::Embedding(_))));
}

#[test]
fn test_translate_empty_skips_upstream() {
    let translator = Arc::new(StubTranslator::new("hello"));
    let app = create_app(Arc::new(StubEmbedder::new(&["saree"])), translator.clone());

    assert_eq!(app.translate("").unwrap(), "");
    assert_eq!(app.translate("   \n").unwrap(), "");
    assert_eq!(translator.calls(), 0);
}

#[test]
fn test_translate_returns_upstream_text() {
    let translator = Arc::new(StubTranslator::new("how are you"));
    let app = create_app(Arc::new(StubEmbedder::new(&["saree"])), translator.clone());

    assert_eq!(app.translate("आप कैसे हैं").unwrap(), "how are you");
    assert_eq!(translator.calls(), 1);
}

#[test]
fn test_translate_failure_propagates() {
    let app = create_app(
        Arc::new(StubEmbedder::new(&["saree"])),
        Arc::new(FailingTranslator),
    );

    let result = app.translate("नमस्ते");
    assert!(matches!(result, Err(AppError::Translate(_))));
}
