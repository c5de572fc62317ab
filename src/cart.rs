use serde::{Deserialize, Serialize};

use crate::catalog::Product;

/// One product's entry in the cart, carrying its quantity.
///
/// Serializes with the product fields flattened beside `quantity`, so the
/// persisted representation is an array of
/// `{id, title, price, image, category, description, rating, quantity}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    pub fn subtotal(&self) -> f64 {
        self.product.price * f64::from(self.quantity)
    }
}

/// Derived cart aggregates. Never stored independently of the lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CartTotals {
    pub item_count: u32,
    pub total_price: f64,
}

impl CartTotals {
    pub fn zero() -> Self {
        Self {
            item_count: 0,
            total_price: 0.0,
        }
    }
}

/// Ordered cart state: at most one line per product id, insertion order
/// preserved (first product added stays first in the listing).
///
/// Every mutating command recomputes and returns the derived totals, so a
/// read between two mutations is never stale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from restored lines, preserving their order.
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    /// Add one unit of a product. An existing line is incremented; a new
    /// product gets a fresh line with quantity 1 at the end.
    pub fn add(&mut self, product: &Product) -> CartTotals {
        match self.lines.iter_mut().find(|l| l.product.id == product.id) {
            Some(line) => line.quantity += 1,
            None => self.lines.push(CartLine {
                product: product.clone(),
                quantity: 1,
            }),
        }
        self.totals()
    }

    /// Delete a product's line. A no-op if the product is not in the cart.
    pub fn remove(&mut self, product_id: u64) -> CartTotals {
        self.lines.retain(|l| l.product.id != product_id);
        self.totals()
    }

    /// Set a line's quantity. Requested values are clamped to a floor of 0,
    /// and a resulting quantity of 0 removes the line entirely. A no-op if
    /// the product is not in the cart.
    pub fn set_quantity(&mut self, product_id: u64, quantity: i64) -> CartTotals {
        let clamped = quantity.clamp(0, i64::from(u32::MAX)) as u32;

        if clamped == 0 {
            return self.remove(product_id);
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.product.id == product_id) {
            line.quantity = clamped;
        }
        self.totals()
    }

    /// Remove all lines.
    pub fn clear(&mut self) -> CartTotals {
        self.lines.clear();
        self.totals()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: u64) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product.id == product_id)
    }

    /// Derived aggregates over the current lines.
    pub fn totals(&self) -> CartTotals {
        CartTotals {
            item_count: self.lines.iter().map(|l| l.quantity).sum(),
            total_price: self.lines.iter().map(CartLine::subtotal).sum(),
        }
    }

    /// Number of lines (distinct products), not units.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::product;

    #[test]
    fn test_add_new_product_appends_line() {
        let mut cart = Cart::new();
        let totals = cart.add(&product(1, "Backpack", 109.95, "accessories"));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.line(1).unwrap().quantity, 1);
        assert_eq!(totals.item_count, 1);
        assert_eq!(totals.total_price, 109.95);
    }

    #[test]
    fn test_add_existing_product_increments_quantity() {
        let mut cart = Cart::new();
        let backpack = product(1, "Backpack", 109.95, "accessories");

        cart.add(&backpack);
        cart.add(&backpack);
        cart.add(&backpack);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.line(1).unwrap().quantity, 3);
    }

    #[test]
    fn test_line_count_bounded_by_distinct_ids() {
        let mut cart = Cart::new();
        let a = product(1, "A", 1.0, "x");
        let b = product(2, "B", 2.0, "x");

        for _ in 0..5 {
            cart.add(&a);
            cart.add(&b);
        }

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.line(1).unwrap().quantity, 5);
        assert_eq!(cart.line(2).unwrap().quantity, 5);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = Cart::new();
        cart.add(&product(3, "C", 1.0, "x"));
        cart.add(&product(1, "A", 1.0, "x"));
        cart.add(&product(2, "B", 1.0, "x"));
        cart.add(&product(3, "C", 1.0, "x"));

        let ids: Vec<u64> = cart.lines().iter().map(|l| l.product.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_totals_after_mixed_adds() {
        // Add A (10.00) twice, then B (5.50) once.
        let mut cart = Cart::new();
        let a = product(1, "A", 10.0, "x");
        let b = product(2, "B", 5.5, "x");

        cart.add(&a);
        cart.add(&a);
        let totals = cart.add(&b);

        assert_eq!(cart.line(1).unwrap().quantity, 2);
        assert_eq!(cart.line(2).unwrap().quantity, 1);
        assert_eq!(totals.item_count, 3);
        assert_eq!(totals.total_price, 25.5);
    }

    #[test]
    fn test_totals_consistent_after_every_mutation() {
        let mut cart = Cart::new();
        let a = product(1, "A", 2.5, "x");
        let b = product(2, "B", 4.0, "x");

        let t = cart.add(&a);
        assert_eq!(t, cart.totals());

        let t = cart.add(&b);
        assert_eq!(t, cart.totals());
        assert_eq!(t.item_count, 2);
        assert_eq!(t.total_price, 6.5);

        let t = cart.set_quantity(1, 4);
        assert_eq!(t, cart.totals());
        assert_eq!(t.item_count, 5);
        assert_eq!(t.total_price, 14.0);

        let t = cart.remove(2);
        assert_eq!(t, cart.totals());
        assert_eq!(t.total_price, 10.0);

        let t = cart.clear();
        assert_eq!(t, cart.totals());
        assert_eq!(t, CartTotals::zero());
    }

    #[test]
    fn test_set_quantity_exact_value() {
        let mut cart = Cart::new();
        cart.add(&product(1, "A", 3.0, "x"));

        let totals = cart.set_quantity(1, 7);

        assert_eq!(cart.line(1).unwrap().quantity, 7);
        assert_eq!(totals.item_count, 7);
        assert_eq!(totals.total_price, 21.0);
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let mut cart = Cart::new();
        let a = product(1, "A", 3.0, "x");
        cart.add(&a);
        cart.add(&a);

        let totals = cart.set_quantity(1, 0);

        assert!(cart.is_empty());
        assert_eq!(totals, CartTotals::zero());
    }

    #[test]
    fn test_set_quantity_negative_clamps_to_removal() {
        let mut cart = Cart::new();
        cart.add(&product(1, "A", 3.0, "x"));

        cart.set_quantity(1, -4);

        assert!(cart.is_empty());
        assert!(cart.lines().iter().all(|l| l.quantity >= 1));
    }

    #[test]
    fn test_set_quantity_unknown_id_is_noop() {
        let mut cart = Cart::new();
        cart.add(&product(1, "A", 3.0, "x"));

        let totals = cart.set_quantity(99, 5);

        assert_eq!(cart.len(), 1);
        assert_eq!(totals.item_count, 1);
    }

    #[test]
    fn test_remove_absent_id_is_noop() {
        let mut cart = Cart::new();
        cart.add(&product(1, "A", 3.0, "x"));
        let before = cart.clone();

        cart.remove(42);

        assert_eq!(cart, before);
    }

    #[test]
    fn test_clear_zeroes_everything() {
        let mut cart = Cart::new();
        cart.add(&product(1, "A", 3.0, "x"));
        cart.add(&product(2, "B", 4.0, "x"));

        let totals = cart.clear();

        assert!(cart.is_empty());
        assert_eq!(totals.item_count, 0);
        assert_eq!(totals.total_price, 0.0);
    }

    #[test]
    fn test_line_serialization_flattens_product() {
        let line = CartLine {
            product: product(1, "A", 3.0, "x"),
            quantity: 2,
        };

        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["title"], "A");
        assert_eq!(json["quantity"], 2);
        assert!(json.get("product").is_none());

        let back: CartLine = serde_json::from_value(json).unwrap();
        assert_eq!(back, line);
    }
}
