//! Persistence layer for customers, products and orders.
//!
//! The repository traits in [`repository`] are the only way the rest of the
//! system touches stored records. [`InMemoryStore`] backs tests and the
//! default server mode; [`PostgresStore`] is the production implementation.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod record;
pub mod repository;

pub use common::{CustomerId, Money, OrderId, ProductId};
pub use error::{Result, StoreError};
pub use memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use record::{
    Customer, NewCustomer, NewOrder, NewProduct, Order, PricedLineItem, Product, StockUpdate,
};
pub use repository::{CustomerRepository, OrderRepository, ProductRepository};
