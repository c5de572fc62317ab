pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod index;
pub mod loader;
pub mod persist;
pub mod query;

#[cfg(test)]
pub(crate) mod test_utils;

use std::path::Path;
use std::sync::{Arc, RwLock};

use tracing::info;

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::ShopError;
use crate::index::SearchIndex;
use crate::persist::CartPersister;
use crate::query::QueryEngine;

// Re-export key types for convenience
pub use crate::cart::{CartLine, CartTotals};
pub use crate::catalog::{Product, Rating};
pub use crate::loader::CatalogSource;
pub use crate::query::SearchHit;

/// Thread-safe storefront handle
pub type SharedShop = Arc<RwLock<Shop>>;

/// Result of a simulated purchase. No external system is contacted; the
/// order id exists only for display.
#[derive(Debug, Clone)]
pub struct Receipt {
    pub order_id: String,
    pub item_count: u32,
    pub total_price: f64,
}

/// Main interface to the storefront: catalog reads, search and cart
/// commands. Construct one per application and hand it to every consumer.
pub struct Shop {
    catalog: Catalog,
    search_index: SearchIndex,
    cart: Cart,
    persister: CartPersister,
}

impl Shop {
    /// Open a shop in the current directory over the bundled catalog
    pub fn open_or_create() -> Result<Self, ShopError> {
        Self::open(Config::from_current_dir()?, &CatalogSource::Bundled)
    }

    /// Open a shop at a specific base path
    pub fn open_or_create_at(
        base_path: &Path,
        source: &CatalogSource,
    ) -> Result<Self, ShopError> {
        Self::open(Config::new(base_path.to_path_buf()), source)
    }

    /// Open a shop: load the catalog, build the search index and restore
    /// any persisted cart state
    pub fn open(config: Config, source: &CatalogSource) -> Result<Self, ShopError> {
        config.ensure_directories()?;

        let products = loader::load(source)?;
        let catalog = Catalog::from_products(products)?;
        let search_index = SearchIndex::build(catalog.products())?;

        let persister = CartPersister::new(config.cart_path());
        let cart = persister.load();

        info!(
            "Loaded {} products from {}, restored {} cart line(s)",
            catalog.len(),
            source.describe(),
            cart.len()
        );

        Ok(Self {
            catalog,
            search_index,
            cart,
            persister,
        })
    }

    /// Wrap in Arc<RwLock<>> for shared access
    pub fn into_shared(self) -> SharedShop {
        Arc::new(RwLock::new(self))
    }

    // === Catalog reads ===

    /// All products in catalog order
    pub fn products(&self) -> &[Product] {
        self.catalog.products()
    }

    /// Look up one product; `None` maps to a "not found" view state
    pub fn product(&self, product_id: u64) -> Option<&Product> {
        self.catalog.get(product_id)
    }

    pub fn categories(&self) -> Vec<String> {
        self.catalog.categories()
    }

    pub fn product_count(&self) -> usize {
        self.catalog.len()
    }

    // === Search ===

    /// Full-text search
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, ShopError> {
        QueryEngine::new(&self.search_index).search(query, limit)
    }

    /// All products in an exact category
    pub fn search_by_category(
        &self,
        category: &str,
        limit: usize,
    ) -> Result<Vec<SearchHit>, ShopError> {
        QueryEngine::new(&self.search_index).search_by_category(category, limit)
    }

    /// Combined text + category + minimum-rating filter
    pub fn search_filtered(
        &self,
        text: Option<&str>,
        category: Option<&str>,
        min_rating: Option<f64>,
        limit: usize,
    ) -> Result<Vec<SearchHit>, ShopError> {
        QueryEngine::new(&self.search_index).search_filtered(text, category, min_rating, limit)
    }

    /// Resolve hits back to catalog products, preserving hit order
    pub fn resolve_hits(&self, hits: &[SearchHit]) -> Vec<&Product> {
        hits.iter()
            .filter_map(|hit| self.catalog.get(hit.product_id))
            .collect()
    }

    // === Cart commands ===

    /// Add one unit of a catalog product to the cart
    pub fn add_to_cart(&mut self, product_id: u64) -> Result<CartTotals, ShopError> {
        let product = self
            .catalog
            .get(product_id)
            .ok_or(ShopError::ProductNotFound(product_id))?;

        let totals = self.cart.add(product);
        self.persister.save(&self.cart);
        Ok(totals)
    }

    /// Remove a product's line; a no-op for products not in the cart
    pub fn remove_from_cart(&mut self, product_id: u64) -> CartTotals {
        let totals = self.cart.remove(product_id);
        self.persister.save(&self.cart);
        totals
    }

    /// Set a line's quantity; values clamp to a floor of 0 and 0 removes
    /// the line
    pub fn set_quantity(&mut self, product_id: u64, quantity: i64) -> CartTotals {
        let totals = self.cart.set_quantity(product_id, quantity);
        self.persister.save(&self.cart);
        totals
    }

    /// Empty the cart and erase its persisted state
    pub fn clear_cart(&mut self) -> CartTotals {
        let totals = self.cart.clear();
        self.persister.erase();
        totals
    }

    /// Simulated purchase: capture a receipt, then empty the cart and erase
    /// its persisted state
    pub fn checkout(&mut self) -> Result<Receipt, ShopError> {
        if self.cart.is_empty() {
            return Err(ShopError::EmptyCart);
        }

        let totals = self.cart.totals();
        let receipt = Receipt {
            order_id: uuid::Uuid::new_v4().to_string(),
            item_count: totals.item_count,
            total_price: totals.total_price,
        };

        self.cart.clear();
        self.persister.erase();

        info!(
            "Order {} confirmed for {} item(s)",
            receipt.order_id, receipt.item_count
        );
        Ok(receipt)
    }

    // === Cart reads ===

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_totals(&self) -> CartTotals {
        self.cart.totals()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::scratch_dir;

    fn shop_fixture(label: &str) -> Shop {
        Shop::open_or_create_at(&scratch_dir(label), &CatalogSource::Bundled).unwrap()
    }

    #[test]
    fn test_open_starts_with_empty_cart() {
        let shop = shop_fixture("open");
        assert!(shop.cart().is_empty());
        assert!(shop.product_count() > 0);
    }

    #[test]
    fn test_add_unknown_product_errors() {
        let mut shop = shop_fixture("unknown");
        let result = shop.add_to_cart(10_000);

        assert!(matches!(result, Err(ShopError::ProductNotFound(10_000))));
        assert!(shop.cart().is_empty());
    }

    #[test]
    fn test_cart_survives_reload() {
        let base = scratch_dir("reload");

        {
            let mut shop = Shop::open_or_create_at(&base, &CatalogSource::Bundled).unwrap();
            shop.add_to_cart(1).unwrap();
            shop.add_to_cart(1).unwrap();
            shop.add_to_cart(2).unwrap();
        }

        let shop = Shop::open_or_create_at(&base, &CatalogSource::Bundled).unwrap();
        assert_eq!(shop.cart().len(), 2);
        assert_eq!(shop.cart().line(1).unwrap().quantity, 2);
        assert_eq!(shop.cart_totals().item_count, 3);
    }

    #[test]
    fn test_malformed_persisted_state_falls_back_to_empty() {
        let base = scratch_dir("malformed");
        let config = Config::new(base.clone());
        config.ensure_directories().unwrap();
        std::fs::write(config.cart_path(), "never json").unwrap();

        let shop = Shop::open_or_create_at(&base, &CatalogSource::Bundled).unwrap();
        assert!(shop.cart().is_empty());
    }

    #[test]
    fn test_clear_cart_erases_persisted_state() {
        let base = scratch_dir("clear");

        {
            let mut shop = Shop::open_or_create_at(&base, &CatalogSource::Bundled).unwrap();
            shop.add_to_cart(1).unwrap();
            shop.clear_cart();
        }

        assert!(!Config::new(base.clone()).cart_path().exists());

        let shop = Shop::open_or_create_at(&base, &CatalogSource::Bundled).unwrap();
        assert!(shop.cart().is_empty());
    }

    #[test]
    fn test_checkout_returns_receipt_and_empties_cart() {
        let base = scratch_dir("checkout");
        let mut shop = Shop::open_or_create_at(&base, &CatalogSource::Bundled).unwrap();

        shop.add_to_cart(1).unwrap();
        shop.add_to_cart(2).unwrap();
        let expected = shop.cart_totals();

        let receipt = shop.checkout().unwrap();
        assert_eq!(receipt.item_count, expected.item_count);
        assert_eq!(receipt.total_price, expected.total_price);
        assert!(!receipt.order_id.is_empty());

        assert!(shop.cart().is_empty());
        assert!(!Config::new(base).cart_path().exists());
    }

    #[test]
    fn test_checkout_on_empty_cart_errors() {
        let mut shop = shop_fixture("empty-checkout");
        assert!(matches!(shop.checkout(), Err(ShopError::EmptyCart)));
    }

    #[test]
    fn test_search_resolves_to_products() {
        let shop = shop_fixture("search");
        let hits = shop.search("backpack", 10).unwrap();
        let products = shop.resolve_hits(&hits);

        assert!(!products.is_empty());
        assert!(
            products
                .iter()
                .any(|p| p.title.to_lowercase().contains("backpack"))
        );
    }

    #[test]
    fn test_shared_shop() {
        let shop = shop_fixture("shared").into_shared();

        {
            let mut guard = shop.write().unwrap();
            guard.add_to_cart(1).unwrap();
        }
        {
            let guard = shop.read().unwrap();
            assert_eq!(guard.cart_totals().item_count, 1);
        }
    }
}
