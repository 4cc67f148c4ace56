//! Order commands.

use common::{CustomerId, ProductId};
use serde::Deserialize;

/// One requested (product, quantity) pairing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LineItemRequest {
    /// The product to order.
    pub id: ProductId,

    /// Units requested; must be greater than zero.
    pub quantity: u32,
}

impl LineItemRequest {
    /// Creates a new line item request.
    pub fn new(id: impl Into<ProductId>, quantity: u32) -> Self {
        Self {
            id: id.into(),
            quantity,
        }
    }
}

/// Command to place a new order.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    /// The customer placing the order.
    pub customer_id: CustomerId,

    /// Requested lines in the order the caller listed them.
    pub products: Vec<LineItemRequest>,
}

impl CreateOrder {
    /// Creates a new CreateOrder command.
    pub fn new(customer_id: impl Into<CustomerId>, products: Vec<LineItemRequest>) -> Self {
        Self {
            customer_id: customer_id.into(),
            products,
        }
    }

    /// Returns the requested product ids in request order, duplicates included.
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.products.iter().map(|line| line.id.clone()).collect()
    }
}
