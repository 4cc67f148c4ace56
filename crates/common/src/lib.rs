//! Shared types for the order-management backend.
//!
//! Identifiers are newtypes so a customer id can never be passed where a
//! product id is expected. Money is kept in integer cents.

mod money;
mod types;

pub use money::Money;
pub use types::{CustomerId, OrderId, ProductId};
