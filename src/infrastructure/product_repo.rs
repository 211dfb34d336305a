use chrono::Utc;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::ProductCatalog;
use crate::domain::product::{NewProduct, Product, StockUpdate};
use crate::schema::products;

use super::models::{NewProductRow, ProductRow};

pub struct DieselProductCatalog {
    pool: DbPool,
}

impl DieselProductCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ProductCatalog for DieselProductCatalog {
    fn find_all_by_id(&self, ids: &[Uuid]) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = products::table
            .filter(products::id.eq_any(ids.to_vec()))
            .select(ProductRow::as_select())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = products::table
            .filter(products::name.eq(name))
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(Product::from))
    }

    fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(products::table)
            .values(&NewProductRow {
                id: Uuid::new_v4(),
                name: product.name.clone(),
                price: product.price,
                quantity: product.quantity,
            })
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)
            .map_err(|e| match e {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    DomainError::ProductNameInUse(product.name)
                }
                other => other.into(),
            })?;

        Ok(row.into())
    }

    fn update_quantity(&self, updates: &[StockUpdate]) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let now = Utc::now();
            for update in updates {
                // Compare-and-set against the quantity the caller read.
                let affected = diesel::update(
                    products::table
                        .filter(products::id.eq(update.product_id))
                        .filter(products::quantity.eq(update.expected_quantity)),
                )
                .set((
                    products::quantity.eq(update.new_quantity),
                    products::updated_at.eq(now),
                ))
                .execute(conn)?;

                if affected == 0 {
                    log::warn!(
                        "Stock of product {} no longer {}, rolling back",
                        update.product_id,
                        update.expected_quantity
                    );
                    return Err(DomainError::StockConflict(update.product_id));
                }
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use uuid::Uuid;

    use super::DieselProductCatalog;
    use crate::domain::errors::DomainError;
    use crate::domain::ports::ProductCatalog;
    use crate::domain::product::{NewProduct, StockUpdate};
    use crate::infrastructure::test_support::setup_db;

    fn new_product(name: &str, quantity: i32) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            price: BigDecimal::from_str("5.00").expect("valid decimal"),
            quantity,
        }
    }

    fn quantity_of(repo: &DieselProductCatalog, id: Uuid) -> i32 {
        repo.find_all_by_id(&[id]).expect("find failed")[0].quantity
    }

    #[tokio::test]
    #[ignore = "requires a container runtime (docker or podman)"]
    async fn find_all_by_id_skips_unknown_ids() {
        let (_container, pool) = setup_db().await;
        let repo = DieselProductCatalog::new(pool);
        let a = repo.create(new_product("A", 1)).expect("create failed");
        let b = repo.create(new_product("B", 2)).expect("create failed");

        let mut found: Vec<Uuid> = repo
            .find_all_by_id(&[a.id, Uuid::new_v4(), b.id])
            .expect("find failed")
            .into_iter()
            .map(|p| p.id)
            .collect();
        found.sort();
        let mut expected = vec![a.id, b.id];
        expected.sort();

        assert_eq!(found, expected);
    }

    #[tokio::test]
    #[ignore = "requires a container runtime (docker or podman)"]
    async fn update_quantity_applies_matching_updates() {
        let (_container, pool) = setup_db().await;
        let repo = DieselProductCatalog::new(pool);
        let p = repo.create(new_product("P1", 10)).expect("create failed");

        repo.update_quantity(&[StockUpdate {
            product_id: p.id,
            expected_quantity: 10,
            new_quantity: 7,
        }])
        .expect("update failed");

        assert_eq!(quantity_of(&repo, p.id), 7);
    }

    #[tokio::test]
    #[ignore = "requires a container runtime (docker or podman)"]
    async fn stale_update_rolls_back_the_whole_batch() {
        let (_container, pool) = setup_db().await;
        let repo = DieselProductCatalog::new(pool);
        let fresh = repo.create(new_product("Fresh", 10)).expect("create failed");
        let stale = repo.create(new_product("Stale", 10)).expect("create failed");

        let err = repo
            .update_quantity(&[
                StockUpdate {
                    product_id: fresh.id,
                    expected_quantity: 10,
                    new_quantity: 9,
                },
                StockUpdate {
                    product_id: stale.id,
                    expected_quantity: 12,
                    new_quantity: 11,
                },
            ])
            .unwrap_err();

        assert!(matches!(err, DomainError::StockConflict(id) if id == stale.id));
        assert_eq!(quantity_of(&repo, fresh.id), 10);
        assert_eq!(quantity_of(&repo, stale.id), 10);
    }

    #[tokio::test]
    #[ignore = "requires a container runtime (docker or podman)"]
    async fn duplicate_name_insert_is_name_in_use() {
        let (_container, pool) = setup_db().await;
        let repo = DieselProductCatalog::new(pool);

        repo.create(new_product("Keyboard", 1)).expect("first create failed");
        let err = repo.create(new_product("Keyboard", 2)).unwrap_err();

        assert!(matches!(err, DomainError::ProductNameInUse(ref n) if n == "Keyboard"));
    }

    #[tokio::test]
    #[ignore = "requires a container runtime (docker or podman)"]
    async fn find_by_name_matches_exactly() {
        let (_container, pool) = setup_db().await;
        let repo = DieselProductCatalog::new(pool);
        repo.create(new_product("Keyboard", 1)).expect("create failed");

        assert!(repo.find_by_name("Keyboard").expect("find failed").is_some());
        assert!(repo.find_by_name("keyboard").expect("find failed").is_none());
    }
}
