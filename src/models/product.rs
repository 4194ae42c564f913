//! Product catalog model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A product on sale at the counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier for the product.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Catalog grouping (e.g. "bread", "pastry").
    pub category: String,
    /// Unit price.
    pub price: Decimal,
    /// Units on hand.
    pub stock: u32,
    /// Inactive products stay in history but cannot be sold.
    pub active: bool,
}
