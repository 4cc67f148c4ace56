//! Customer registration and lookup.

use common::CustomerId;
use store::{Customer, CustomerRepository, NewCustomer, StoreError};

use crate::error::DomainError;

/// Command to register a customer.
#[derive(Debug, Clone)]
pub struct CreateCustomer {
    pub name: String,
    pub email: String,
}

impl CreateCustomer {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Service for registering and loading customers.
pub struct CustomerService<C: CustomerRepository> {
    customers: C,
}

impl<C: CustomerRepository> CustomerService<C> {
    pub fn new(customers: C) -> Self {
        Self { customers }
    }

    /// Registers a customer. Emails are unique across customers.
    ///
    /// The lookup catches most duplicates; a concurrent registration that
    /// slips past it is caught by the store's unique index.
    #[tracing::instrument(skip(self))]
    pub async fn create(&self, cmd: CreateCustomer) -> Result<Customer, DomainError> {
        if self.customers.find_by_email(&cmd.email).await?.is_some() {
            return Err(DomainError::EmailAlreadyInUse { email: cmd.email });
        }

        let customer = self
            .customers
            .create(NewCustomer {
                name: cmd.name,
                email: cmd.email,
            })
            .await
            .map_err(|e| match e {
                StoreError::Duplicate { value, .. } => DomainError::EmailAlreadyInUse { email: value },
                other => other.into(),
            })?;

        metrics::counter!("customers_created_total").increment(1);
        tracing::info!(customer_id = %customer.id, "customer created");
        Ok(customer)
    }

    /// Loads a customer by id.
    #[tracing::instrument(skip(self))]
    pub async fn find(&self, customer_id: &CustomerId) -> Result<Customer, DomainError> {
        self.customers
            .find_by_id(customer_id)
            .await?
            .ok_or_else(|| DomainError::CustomerNotFound(customer_id.clone()))
    }
}
