//! # Inventory Summary
//!
//! Low-stock figures for the products screen.

use crate::types::ProductStock;

/// Products at or below their reorder point, in input order.
pub fn low_stock(products: &[ProductStock], default_threshold: i64) -> Vec<&ProductStock> {
    products
        .iter()
        .filter(|product| product.is_low(default_threshold))
        .collect()
}

/// Number of products at or below their reorder point.
pub fn count_low_stock(products: &[ProductStock], default_threshold: i64) -> usize {
    products
        .iter()
        .filter(|product| product.is_low(default_threshold))
        .count()
}
