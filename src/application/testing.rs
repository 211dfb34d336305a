//! In-memory port implementations for service tests.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use bigdecimal::BigDecimal;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::customer::{Customer, NewCustomer};
use crate::domain::errors::DomainError;
use crate::domain::order::{ListResult, Order, OrderLine, OrderLineInput, OrderStatus};
use crate::domain::ports::{CustomerDirectory, OrderStore, ProductCatalog};
use crate::domain::product::{NewProduct, Product, StockUpdate};

#[derive(Clone, Default)]
pub struct InMemoryCustomers {
    customers: Arc<Mutex<Vec<Customer>>>,
}

impl InMemoryCustomers {
    pub fn add(&self, name: &str, email: &str) -> Customer {
        self.create(NewCustomer {
            name: name.to_string(),
            email: email.to_string(),
        })
        .unwrap()
    }

    pub fn count(&self) -> usize {
        self.customers.lock().unwrap().len()
    }
}

impl CustomerDirectory for InMemoryCustomers {
    fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, DomainError> {
        let customers = self.customers.lock().unwrap();
        Ok(customers.iter().find(|c| c.id == id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Customer>, DomainError> {
        let customers = self.customers.lock().unwrap();
        Ok(customers.iter().find(|c| c.email == email).cloned())
    }

    fn create(&self, customer: NewCustomer) -> Result<Customer, DomainError> {
        let customer = Customer {
            id: Uuid::new_v4(),
            name: customer.name,
            email: customer.email,
            created_at: Utc::now(),
        };
        self.customers.lock().unwrap().push(customer.clone());
        Ok(customer)
    }
}

#[derive(Default)]
struct CatalogState {
    products: HashMap<Uuid, Product>,
    /// Simulates another writer changing stock right after a lookup.
    change_after_lookup: Option<(Uuid, i32)>,
}

#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    state: Arc<Mutex<CatalogState>>,
}

impl InMemoryCatalog {
    pub fn add(&self, name: &str, price: &str, quantity: i32) -> Uuid {
        self.create(NewProduct {
            name: name.to_string(),
            price: BigDecimal::from_str(price).unwrap(),
            quantity,
        })
        .unwrap()
        .id
    }

    pub fn quantity_of(&self, id: Uuid) -> i32 {
        self.state.lock().unwrap().products[&id].quantity
    }

    pub fn count(&self) -> usize {
        self.state.lock().unwrap().products.len()
    }

    pub fn change_after_next_lookup(&self, id: Uuid, quantity: i32) {
        self.state.lock().unwrap().change_after_lookup = Some((id, quantity));
    }
}

impl ProductCatalog for InMemoryCatalog {
    fn find_all_by_id(&self, ids: &[Uuid]) -> Result<Vec<Product>, DomainError> {
        let mut state = self.state.lock().unwrap();
        let found: Vec<Product> = ids
            .iter()
            .filter_map(|id| state.products.get(id).cloned())
            .collect();
        if let Some((id, quantity)) = state.change_after_lookup.take() {
            if let Some(product) = state.products.get_mut(&id) {
                product.quantity = quantity;
            }
        }
        Ok(found)
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Product>, DomainError> {
        let state = self.state.lock().unwrap();
        Ok(state.products.values().find(|p| p.name == name).cloned())
    }

    fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        let product = Product {
            id: Uuid::new_v4(),
            name: product.name,
            price: product.price,
            quantity: product.quantity,
            created_at: Utc::now(),
        };
        self.state
            .lock()
            .unwrap()
            .products
            .insert(product.id, product.clone());
        Ok(product)
    }

    fn update_quantity(&self, updates: &[StockUpdate]) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap();
        for update in updates {
            let current = state.products.get(&update.product_id).map(|p| p.quantity);
            if current != Some(update.expected_quantity) {
                return Err(DomainError::StockConflict(update.product_id));
            }
        }
        for update in updates {
            if let Some(product) = state.products.get_mut(&update.product_id) {
                product.quantity = update.new_quantity;
            }
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryOrders {
    orders: Arc<Mutex<Vec<Order>>>,
    status_updates_fail: Arc<AtomicBool>,
}

impl InMemoryOrders {
    pub fn fail_status_updates(&self) {
        self.status_updates_fail.store(true, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.orders.lock().unwrap().len()
    }

    pub fn all(&self) -> Vec<Order> {
        self.orders.lock().unwrap().clone()
    }
}

impl OrderStore for InMemoryOrders {
    fn create(&self, customer: &Customer, lines: Vec<OrderLineInput>) -> Result<Order, DomainError> {
        let order = Order {
            id: Uuid::new_v4(),
            customer_id: customer.id,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            lines: lines
                .into_iter()
                .map(|l| OrderLine {
                    id: Uuid::new_v4(),
                    product_id: l.product_id,
                    quantity: l.quantity,
                    unit_price: l.unit_price,
                })
                .collect(),
        };
        self.orders.lock().unwrap().push(order.clone());
        Ok(order)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        let orders = self.orders.lock().unwrap();
        Ok(orders.iter().find(|o| o.id == id).cloned())
    }

    /// Newest first, like the Diesel store.
    fn list(&self, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        let orders = self.orders.lock().unwrap();
        let offset = ((page - 1) * limit) as usize;
        Ok(ListResult {
            items: orders
                .iter()
                .rev()
                .skip(offset)
                .take(limit as usize)
                .cloned()
                .collect(),
            total: orders.len() as i64,
        })
    }

    fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<(), DomainError> {
        if self.status_updates_fail.load(Ordering::SeqCst) {
            return Err(DomainError::Internal("order store unavailable".to_string()));
        }
        let mut orders = self.orders.lock().unwrap();
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(DomainError::OrderNotFound)?;
        order.status = status;
        Ok(())
    }
}
