//! Shared fixtures for unit tests.

use std::path::PathBuf;

use crate::catalog::{Product, Rating};

pub fn product(id: u64, title: &str, price: f64, category: &str) -> Product {
    product_rated(id, title, price, category, 4.0)
}

pub fn product_rated(id: u64, title: &str, price: f64, category: &str, rate: f64) -> Product {
    Product {
        id,
        title: title.to_string(),
        price,
        description: format!("{title} description"),
        category: category.to_string(),
        image: format!("https://img.example/products/{id}.png"),
        rating: Rating { rate, count: 10 },
    }
}

pub fn sample_products() -> Vec<Product> {
    vec![
        product_rated(1, "Canvas Hiking Backpack", 109.95, "accessories", 3.9),
        product_rated(2, "Slim Fit Cotton T-Shirt", 22.3, "men's clothing", 4.1),
        product_rated(3, "Gold Plated Ring", 168.0, "jewelry", 4.6),
        product_rated(4, "Curved Gaming Monitor", 999.99, "electronics", 2.9),
    ]
}

/// Unique scratch directory under the system temp dir.
pub fn scratch_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("rocketshop-{}-{}", label, uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
