use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ShopError;

const DATA_DIR_NAME: &str = ".rocketshop";

/// Fixed key under which the cart state is persisted.
const CART_STATE_KEY: &str = "rocketShopCart";

/// Configuration for data paths and directories
#[derive(Debug, Clone)]
pub struct Config {
    base_dir: PathBuf,
}

impl Config {
    /// Create config with a specific base directory
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Create config using the current working directory
    pub fn from_current_dir() -> Result<Self, ShopError> {
        let cwd = std::env::current_dir()?;
        Ok(Self::new(cwd.join(DATA_DIR_NAME)))
    }

    /// Get the base directory path
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the file path backing the `rocketShopCart` key
    pub fn cart_path(&self) -> PathBuf {
        self.base_dir.join(format!("{CART_STATE_KEY}.json"))
    }

    /// Create the data directory if it doesn't exist
    pub fn ensure_directories(&self) -> Result<(), ShopError> {
        fs::create_dir_all(&self.base_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_path_uses_fixed_key() {
        let config = Config::new(PathBuf::from("/tmp/shop-data"));
        assert_eq!(
            config.cart_path(),
            PathBuf::from("/tmp/shop-data/rocketShopCart.json")
        );
    }

    #[test]
    fn test_ensure_directories() {
        let base = crate::test_utils::scratch_dir("config").join("nested");
        let config = Config::new(base.clone());

        config.ensure_directories().unwrap();
        assert!(base.is_dir());

        // Idempotent
        config.ensure_directories().unwrap();
    }
}
