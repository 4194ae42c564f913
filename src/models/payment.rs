//! Sales, order payments and expenses feeding the cash register.
//!
//! Payment types are kept exactly as they were received. Older clients sent
//! a JSON object (`{"type": "CASH", ...}`) instead of a plain enum string, so
//! the stored value is only resolved to a [`PaymentType`] at aggregation time
//! (see [`crate::cash::normalize_payment_type`]).

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Resolved tender type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    /// Notes and coins in the drawer.
    Cash,
    /// Debit or credit card.
    Card,
    /// Bank transfer.
    Transfer,
    /// Split across several tenders.
    Mixed,
}

impl PaymentType {
    /// Parses the canonical enum spelling, ignoring case and surrounding space.
    ///
    /// ```
    /// use bakery_pos::models::PaymentType;
    ///
    /// assert_eq!(PaymentType::from_code(" card "), Some(PaymentType::Card));
    /// assert_eq!(PaymentType::from_code("cheque"), None);
    /// ```
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "CASH" => Some(PaymentType::Cash),
            "CARD" => Some(PaymentType::Card),
            "TRANSFER" => Some(PaymentType::Transfer),
            "MIXED" => Some(PaymentType::Mixed),
            _ => None,
        }
    }
}

impl std::fmt::Display for PaymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentType::Cash => write!(f, "CASH"),
            PaymentType::Card => write!(f, "CARD"),
            PaymentType::Transfer => write!(f, "TRANSFER"),
            PaymentType::Mixed => write!(f, "MIXED"),
        }
    }
}

/// Which stream a payment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentSource {
    /// Counter sale of catalog products.
    Sale,
    /// Payment for a customized cake from the cake bar.
    CakeBar,
    /// Payment (deposit or balance) for a custom order.
    CustomOrder,
}

/// One line of a counter sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    /// The product sold.
    pub product_id: Uuid,
    /// Product name at the time of sale.
    pub product_name: String,
    /// Units sold.
    pub quantity: u32,
    /// Catalog price at the time of sale.
    pub unit_price: Decimal,
    /// `unit_price * quantity`.
    pub subtotal: Decimal,
}

/// A counter sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    /// Unique identifier for the sale.
    pub id: Uuid,
    /// Register that was open when the sale was rung up.
    pub register_id: Option<Uuid>,
    /// Staff member who made the sale.
    pub sold_by: String,
    /// Lines of the sale.
    pub items: Vec<SaleItem>,
    /// Sum of the line subtotals.
    pub total: Decimal,
    /// Payment type as received.
    pub payment_type: Option<String>,
    /// When the sale was recorded.
    pub created_at: NaiveDateTime,
}

/// A payment against a cake-bar or custom order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayment {
    /// Unique identifier for the payment.
    pub id: Uuid,
    /// The order being paid.
    pub order_reference: String,
    /// Amount received.
    pub amount: Decimal,
    /// Payment type as received.
    pub payment_type: Option<String>,
    /// Staff member who took the payment.
    pub received_by: String,
    /// When the payment was taken.
    pub paid_at: NaiveDateTime,
}

/// Cash paid out of the drawer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Unique identifier for the expense.
    pub id: Uuid,
    /// Amount paid out.
    pub amount: Decimal,
    /// What the money was for.
    pub description: String,
    /// Staff member who recorded it.
    pub recorded_by: String,
    /// When it was paid out.
    pub created_at: NaiveDateTime,
}
