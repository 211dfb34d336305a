use uuid::Uuid;

use super::customer::{Customer, NewCustomer};
use super::errors::DomainError;
use super::order::{ListResult, Order, OrderLineInput, OrderStatus};
use super::product::{NewProduct, Product, StockUpdate};

pub trait CustomerDirectory: Send + Sync + 'static {
    fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, DomainError>;
    fn find_by_email(&self, email: &str) -> Result<Option<Customer>, DomainError>;
    fn create(&self, customer: NewCustomer) -> Result<Customer, DomainError>;
}

pub trait ProductCatalog: Send + Sync + 'static {
    /// Returns the products that exist among `ids`, in no particular order.
    fn find_all_by_id(&self, ids: &[Uuid]) -> Result<Vec<Product>, DomainError>;
    fn find_by_name(&self, name: &str) -> Result<Option<Product>, DomainError>;
    fn create(&self, product: NewProduct) -> Result<Product, DomainError>;
    /// Applies every update or none of them. Fails with
    /// `DomainError::StockConflict` if a stored quantity no longer matches
    /// the update's `expected_quantity`.
    fn update_quantity(&self, updates: &[StockUpdate]) -> Result<(), DomainError>;
}

pub trait OrderStore: Send + Sync + 'static {
    fn create(&self, customer: &Customer, lines: Vec<OrderLineInput>) -> Result<Order, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError>;
    fn list(&self, page: i64, limit: i64) -> Result<ListResult, DomainError>;
    fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<(), DomainError>;
}
