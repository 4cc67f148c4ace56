//! Domain layer for the order-management backend.
//!
//! This crate provides:
//! - The order-creation workflow ([`CreateOrderService`]) with its fail-fast
//!   validator, line pricing and stock adjustment
//! - Customer and product registration services
//! - The [`DomainError`] taxonomy surfaced to callers

pub mod customer;
pub mod error;
pub mod order;
pub mod product;

pub use customer::{CreateCustomer, CustomerService};
pub use error::DomainError;
pub use order::{CreateOrder, CreateOrderService, LineItemRequest, OrderError};
pub use product::{CreateProduct, ProductService};
