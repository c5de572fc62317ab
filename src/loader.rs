use std::path::{Path, PathBuf};

use crate::catalog::Product;
use crate::error::ShopError;

const BUNDLED_CATALOG: &str = include_str!("../data/products.json");

/// Source from which to load the product catalog
#[derive(Debug, Clone)]
pub enum CatalogSource {
    /// Catalog bundled into the binary
    Bundled,
    /// Local JSON file
    File(PathBuf),
    /// Remote URL serving the catalog JSON
    Url(String),
}

impl CatalogSource {
    /// Interpret a CLI/env argument: URLs stay URLs, everything else is a
    /// local file path.
    pub fn parse(source: &str) -> Self {
        if source.starts_with("http://") || source.starts_with("https://") {
            CatalogSource::Url(source.to_string())
        } else {
            CatalogSource::File(PathBuf::from(source))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            CatalogSource::Bundled => "bundled catalog".to_string(),
            CatalogSource::File(p) => p.display().to_string(),
            CatalogSource::Url(u) => u.clone(),
        }
    }
}

/// Load products from a local JSON file
pub fn load_from_path(path: &Path) -> Result<Vec<Product>, ShopError> {
    if !path.exists() {
        return Err(ShopError::InvalidPath(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    parse_catalog(&content, &path.display().to_string())
}

/// Load products from a URL serving catalog JSON
pub fn load_from_url(url: &str) -> Result<Vec<Product>, ShopError> {
    let parsed = url::Url::parse(url).map_err(|e| ShopError::LoadError {
        path: url.to_string(),
        reason: e.to_string(),
    })?;

    let content = reqwest::blocking::get(parsed)
        .map_err(|e| ShopError::LoadError {
            path: url.to_string(),
            reason: e.to_string(),
        })?
        .text()
        .map_err(|e| ShopError::LoadError {
            path: url.to_string(),
            reason: e.to_string(),
        })?;

    parse_catalog(&content, url)
}

/// Load from any source
pub fn load(source: &CatalogSource) -> Result<Vec<Product>, ShopError> {
    match source {
        CatalogSource::Bundled => parse_catalog(BUNDLED_CATALOG, "bundled catalog"),
        CatalogSource::File(p) => load_from_path(p),
        CatalogSource::Url(u) => load_from_url(u),
    }
}

fn parse_catalog(content: &str, origin: &str) -> Result<Vec<Product>, ShopError> {
    serde_json::from_str(content).map_err(|e| ShopError::LoadError {
        path: origin.to_string(),
        reason: e.to_string(),
    })
}
