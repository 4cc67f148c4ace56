//! Order creation: commands, validation, pricing and stock adjustment.

mod commands;
mod pricing;
mod service;
mod stock;
pub mod validator;

pub use commands::{CreateOrder, LineItemRequest};
pub use pricing::price_line_items;
pub use service::CreateOrderService;
pub use stock::compute_stock_updates;

use common::{CustomerId, ProductId};
use thiserror::Error;

/// Reasons an order request is rejected.
///
/// Validation is fail-fast, so a rejected request carries exactly one of
/// these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// The customer placing the order does not exist.
    #[error("Customer not found: {customer_id}")]
    CustomerNotFound { customer_id: CustomerId },

    /// None of the requested products exist (or nothing was requested).
    #[error("Inform at least one existing product")]
    NoProductsProvided,

    /// Some requested products do not exist. Ids are in request order.
    #[error("Could not find products: {}", join_ids(.product_ids))]
    ProductsNotFound { product_ids: Vec<ProductId> },

    /// The units asked for a product exceed its stock.
    ///
    /// `requested` is the total over every line for that product up to and
    /// including the offending one.
    #[error(
        "The quantity {requested} is not available for product {product_id} (available: {available})"
    )]
    InsufficientStock {
        product_id: ProductId,
        requested: u64,
        available: u32,
    },

    /// A line asks for zero units.
    #[error("Invalid quantity for product {product_id} (must be greater than 0)")]
    InvalidQuantity { product_id: ProductId },

    /// The order amount cannot be represented in cents.
    #[error("Order total is too large (line for product {product_id} overflows)")]
    TotalTooLarge { product_id: ProductId },
}

impl OrderError {
    /// Short machine-readable label, used for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            OrderError::CustomerNotFound { .. } => "customer_not_found",
            OrderError::NoProductsProvided => "no_products_provided",
            OrderError::ProductsNotFound { .. } => "products_not_found",
            OrderError::InsufficientStock { .. } => "insufficient_stock",
            OrderError::InvalidQuantity { .. } => "invalid_quantity",
            OrderError::TotalTooLarge { .. } => "total_too_large",
        }
    }
}

fn join_ids(ids: &[ProductId]) -> String {
    ids.iter()
        .map(ProductId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
