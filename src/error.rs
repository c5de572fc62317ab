use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShopError {
    #[error("Tantivy error: {0}")]
    Tantivy(#[from] tantivy::TantivyError),

    #[error("Query parse error: {0}")]
    QueryParse(#[from] tantivy::query::QueryParserError),

    #[error("Product not found: {0}")]
    ProductNotFound(u64),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Failed to load catalog from {path}: {reason}")]
    LoadError { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog path: {0}")]
    InvalidPath(PathBuf),

    #[error("Invalid catalog format: {0}")]
    InvalidCatalogFormat(String),
}
