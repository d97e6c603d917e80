use serde::{Deserialize, Serialize};
use std::path::Path;

/// Built-in catalog compiled into the binary. Used when no products.json
/// exists under the data directory.
const DEFAULT_CATALOG_JSON: &str = include_str!("../assets/products.json");

/// A single product in the catalog.
///
/// `name` doubles as the deduplication key during ranking. Every other
/// field degrades to empty when missing so caller-supplied catalogs with
/// partial objects never fail to parse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogItem {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub tags: Vec<String>,
}

impl CatalogItem {
    /// Text embedded for this item. The "passage:" prefix is the
    /// asymmetric-encoder convention of e5-family embedding models and is
    /// kept verbatim regardless of which model is configured.
    pub fn passage_text(&self) -> String {
        format!(
            "passage: {} {} {} {}",
            self.name,
            self.category,
            self.description,
            self.tags.join(" ")
        )
    }
}

/// Load a catalog from a JSON file.
pub fn load_catalog(path: &Path) -> anyhow::Result<Vec<CatalogItem>> {
    let data = std::fs::read(path)?;
    let items: Vec<CatalogItem> = serde_json::from_slice(&data)?;
    Ok(items)
}

/// Load the catalog from `products.json` under `base_path`, falling back to
/// the built-in default when the file does not exist.
pub fn load_or_default(base_path: &str) -> anyhow::Result<Vec<CatalogItem>> {
    let path = Path::new(base_path).join("products.json");
    if path.is_file() {
        let items = load_catalog(&path)?;
        log::info!("loaded {} products from {}", items.len(), path.display());
        return Ok(items);
    }

    log::info!("no products.json under {base_path}, using built-in catalog");
    default_catalog()
}

/// The built-in default catalog.
pub fn default_catalog() -> anyhow::Result<Vec<CatalogItem>> {
    serde_json::from_str(DEFAULT_CATALOG_JSON)
        .map_err(|err| anyhow::anyhow!("built-in catalog is malformed: {err}"))
}
