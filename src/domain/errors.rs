use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Customer not found")]
    CustomerNotFound,
    #[error("Could not find any products with the given ids")]
    NoProductsFound,
    #[error("Could not find product {0}")]
    ProductNotFound(Uuid),
    #[error("The quantity {requested} is not available for {product_id}")]
    InsufficientStock { product_id: Uuid, requested: i32 },
    /// The catalog quantity changed between lookup and decrement.
    #[error("Stock of product {0} changed while the order was being placed")]
    StockConflict(Uuid),
    #[error("Order not found")]
    OrderNotFound,
    #[error("Email {0} is already in use")]
    EmailInUse(String),
    #[error("A product named {0} already exists")]
    ProductNameInUse(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Internal error: {0}")]
    Internal(String),
}
