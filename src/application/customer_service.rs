use crate::domain::customer::{Customer, NewCustomer};
use crate::domain::errors::DomainError;
use crate::domain::ports::CustomerDirectory;

pub struct CustomerService<C> {
    customers: C,
}

impl<C: CustomerDirectory> CustomerService<C> {
    pub fn new(customers: C) -> Self {
        Self { customers }
    }

    pub fn create_customer(&self, name: String, email: String) -> Result<Customer, DomainError> {
        let name = name.trim().to_string();
        let email = email.trim().to_lowercase();
        if name.is_empty() {
            return Err(DomainError::InvalidInput("name must not be empty".to_string()));
        }
        if !email.contains('@') {
            return Err(DomainError::InvalidInput(format!(
                "'{}' is not a valid email",
                email
            )));
        }

        if self.customers.find_by_email(&email)?.is_some() {
            return Err(DomainError::EmailInUse(email));
        }

        let customer = self.customers.create(NewCustomer { name, email })?;
        log::info!("Created customer {}", customer.id);
        Ok(customer)
    }
}
