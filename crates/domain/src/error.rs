//! Domain error types.

use common::{CustomerId, Money, OrderId, ProductId};
use store::StoreError;
use thiserror::Error;

use crate::order::OrderError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The order request was rejected by validation.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// A repository call failed. Passed through unmodified.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Another customer already registered this email.
    #[error("Email address already in use: {email}")]
    EmailAlreadyInUse { email: String },

    /// Another product already uses this name.
    #[error("Product name already in use: {name}")]
    ProductNameTaken { name: String },

    /// Prices cannot be negative.
    #[error("Invalid price: {price} (must not be negative)")]
    InvalidPrice { price: Money },

    #[error("Customer not found: {0}")]
    CustomerNotFound(CustomerId),

    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),
}
