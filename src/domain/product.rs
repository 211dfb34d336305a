use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    /// Units in stock. Never negative.
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: BigDecimal,
    pub quantity: i32,
}

/// A product id together with the number of units a customer asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestedProduct {
    pub id: Uuid,
    pub quantity: i32,
}

/// Conditional stock write: only applied while the stored quantity still
/// equals `expected_quantity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockUpdate {
    pub product_id: Uuid,
    pub expected_quantity: i32,
    pub new_quantity: i32,
}
