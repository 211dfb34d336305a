pub mod customers;
pub mod orders;
pub mod products;

use crate::application::customer_service::CustomerService;
use crate::application::order_service::OrderService;
use crate::application::product_service::ProductService;
use crate::db::DbPool;
use crate::infrastructure::customer_repo::DieselCustomerDirectory;
use crate::infrastructure::order_repo::DieselOrderStore;
use crate::infrastructure::product_repo::DieselProductCatalog;

pub type DieselOrderService = OrderService<DieselCustomerDirectory, DieselProductCatalog, DieselOrderStore>;

fn order_service(pool: &DbPool) -> DieselOrderService {
    OrderService::new(
        DieselCustomerDirectory::new(pool.clone()),
        DieselProductCatalog::new(pool.clone()),
        DieselOrderStore::new(pool.clone()),
    )
}

fn customer_service(pool: &DbPool) -> CustomerService<DieselCustomerDirectory> {
    CustomerService::new(DieselCustomerDirectory::new(pool.clone()))
}

fn product_service(pool: &DbPool) -> ProductService<DieselProductCatalog> {
    ProductService::new(DieselProductCatalog::new(pool.clone()))
}
