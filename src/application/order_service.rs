use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{ListResult, Order, OrderLineInput, OrderStatus};
use crate::domain::ports::{CustomerDirectory, OrderStore, ProductCatalog};
use crate::domain::product::{Product, RequestedProduct, StockUpdate};

pub struct OrderService<C, P, O> {
    customers: C,
    products: P,
    orders: O,
}

impl<C: CustomerDirectory, P: ProductCatalog, O: OrderStore> OrderService<C, P, O> {
    pub fn new(customers: C, products: P, orders: O) -> Self {
        Self {
            customers,
            products,
            orders,
        }
    }

    /// Places an order for `customer_id`.
    ///
    /// Nothing is written until the customer, every product and every
    /// requested quantity have been validated. Lines are priced at the
    /// catalog price read here, and stock is decremented against the same
    /// read. If that decrement fails the persisted order is cancelled and
    /// the decrement error is returned.
    pub fn create_order(
        &self,
        customer_id: Uuid,
        requested: Vec<RequestedProduct>,
    ) -> Result<Order, DomainError> {
        let customer = self.customers.find_by_id(customer_id)?.ok_or_else(|| {
            log::warn!("Rejected order: customer {} not found", customer_id);
            DomainError::CustomerNotFound
        })?;

        validate_request(&requested)?;

        let ids: Vec<Uuid> = requested.iter().map(|p| p.id).collect();
        let existing = self.products.find_all_by_id(&ids)?;
        if existing.is_empty() {
            log::warn!("Rejected order for customer {}: no products found", customer_id);
            return Err(DomainError::NoProductsFound);
        }

        let catalog: HashMap<Uuid, &Product> = existing.iter().map(|p| (p.id, p)).collect();

        if let Some(missing) = requested.iter().find(|p| !catalog.contains_key(&p.id)) {
            log::warn!(
                "Rejected order for customer {}: product {} not found",
                customer_id,
                missing.id
            );
            return Err(DomainError::ProductNotFound(missing.id));
        }

        let mut lines = Vec::with_capacity(requested.len());
        for item in &requested {
            let product = catalog
                .get(&item.id)
                .ok_or(DomainError::ProductNotFound(item.id))?;
            if item.quantity > product.quantity {
                log::warn!(
                    "Rejected order for customer {}: {} of product {} requested, {} in stock",
                    customer_id,
                    item.quantity,
                    item.id,
                    product.quantity
                );
                return Err(DomainError::InsufficientStock {
                    product_id: item.id,
                    requested: item.quantity,
                });
            }
            lines.push(OrderLineInput {
                product_id: item.id,
                quantity: item.quantity,
                unit_price: product.price.clone(),
            });
        }

        let order = self.orders.create(&customer, lines)?;

        if let Err(e) = self.decrement_stock(&order, &catalog) {
            self.cancel_after_failed_decrement(&order, &e);
            return Err(e);
        }

        log::info!(
            "Created order {} for customer {} with {} line(s)",
            order.id,
            customer.id,
            order.lines.len()
        );
        Ok(order)
    }

    pub fn get_order(&self, id: Uuid) -> Result<Order, DomainError> {
        self.orders.find_by_id(id)?.ok_or(DomainError::OrderNotFound)
    }

    pub fn list_orders(&self, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        self.orders.list(page, limit)
    }

    fn decrement_stock(
        &self,
        order: &Order,
        catalog: &HashMap<Uuid, &Product>,
    ) -> Result<(), DomainError> {
        let updates = order
            .lines
            .iter()
            .map(|line| {
                let product = catalog.get(&line.product_id).ok_or_else(|| {
                    DomainError::Internal(format!(
                        "order {} has a line for unrequested product {}",
                        order.id, line.product_id
                    ))
                })?;
                Ok(StockUpdate {
                    product_id: line.product_id,
                    expected_quantity: product.quantity,
                    new_quantity: product.quantity - line.quantity,
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        self.products.update_quantity(&updates)
    }

    fn cancel_after_failed_decrement(&self, order: &Order, cause: &DomainError) {
        log::warn!("Cancelling order {}: stock update failed: {}", order.id, cause);
        if let Err(e) = self.orders.update_status(order.id, OrderStatus::Cancelled) {
            log::error!("Failed to cancel order {}: {}", order.id, e);
        }
    }
}

fn validate_request(requested: &[RequestedProduct]) -> Result<(), DomainError> {
    if requested.is_empty() {
        return Err(DomainError::InvalidInput(
            "an order needs at least one product".to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(requested.len());
    for item in requested {
        if item.quantity <= 0 {
            return Err(DomainError::InvalidInput(format!(
                "quantity for product {} must be positive, got {}",
                item.id, item.quantity
            )));
        }
        if !seen.insert(item.id) {
            return Err(DomainError::InvalidInput(format!(
                "product {} is listed more than once",
                item.id
            )));
        }
    }
    Ok(())
}
