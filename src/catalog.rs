use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ShopError;

/// Aggregate review score for a product. Informational only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub rate: f64,
    pub count: u64,
}

/// A single catalog record. Immutable after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    pub image: String,
    pub rating: Rating,
}

/// In-memory read-only product catalog
pub struct Catalog {
    products: Vec<Product>,
    by_id: HashMap<u64, usize>,
}

impl Catalog {
    /// Build a catalog from loaded records, rejecting duplicate ids and
    /// negative prices.
    pub fn from_products(products: Vec<Product>) -> Result<Self, ShopError> {
        let mut by_id = HashMap::with_capacity(products.len());

        for (pos, product) in products.iter().enumerate() {
            if product.price < 0.0 {
                return Err(ShopError::InvalidCatalogFormat(format!(
                    "Product {} has a negative price: {}",
                    product.id, product.price
                )));
            }
            if by_id.insert(product.id, pos).is_some() {
                return Err(ShopError::InvalidCatalogFormat(format!(
                    "Duplicate product id: {}",
                    product.id
                )));
            }
        }

        Ok(Self { products, by_id })
    }

    pub fn get(&self, product_id: u64) -> Option<&Product> {
        self.by_id.get(&product_id).map(|&pos| &self.products[pos])
    }

    pub fn contains(&self, product_id: u64) -> bool {
        self.by_id.contains_key(&product_id)
    }

    /// All products in catalog order
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Distinct categories, sorted alphabetically
    pub fn categories(&self) -> Vec<String> {
        self.products
            .iter()
            .map(|p| p.category.clone())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
