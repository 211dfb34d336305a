use bigdecimal::{BigDecimal, Zero};

use crate::domain::errors::DomainError;
use crate::domain::ports::ProductCatalog;
use crate::domain::product::{NewProduct, Product};

/// Prices are stored as NUMERIC(12, 2).
const PRICE_SCALE: i64 = 2;
const PRICE_LIMIT: i64 = 10_000_000_000;

pub struct ProductService<P> {
    products: P,
}

impl<P: ProductCatalog> ProductService<P> {
    pub fn new(products: P) -> Self {
        Self { products }
    }

    pub fn create_product(
        &self,
        name: String,
        price: BigDecimal,
        quantity: i32,
    ) -> Result<Product, DomainError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::InvalidInput("name must not be empty".to_string()));
        }
        if price < BigDecimal::zero() {
            return Err(DomainError::InvalidInput(format!(
                "price must not be negative, got {}",
                price
            )));
        }
        if price.with_scale(PRICE_SCALE) != price {
            return Err(DomainError::InvalidInput(format!(
                "price must have at most {} decimal places, got {}",
                PRICE_SCALE, price
            )));
        }
        if price >= BigDecimal::from(PRICE_LIMIT) {
            return Err(DomainError::InvalidInput(format!(
                "price must be below {}, got {}",
                PRICE_LIMIT, price
            )));
        }
        if quantity < 0 {
            return Err(DomainError::InvalidInput(format!(
                "quantity must not be negative, got {}",
                quantity
            )));
        }

        if self.products.find_by_name(&name)?.is_some() {
            return Err(DomainError::ProductNameInUse(name));
        }

        let product = self.products.create(NewProduct {
            name,
            price,
            quantity,
        })?;
        log::info!("Created product {} with {} in stock", product.id, product.quantity);
        Ok(product)
    }
}
