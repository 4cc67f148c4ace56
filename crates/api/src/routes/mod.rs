//! HTTP route handlers.

pub mod customers;
pub mod orders;
pub mod products;
pub mod system;

use std::sync::Arc;

use domain::{CreateOrderService, CustomerService, ProductService};

use crate::Store;

/// Shared application state accessible from all handlers.
pub struct AppState<S: Store> {
    pub orders: CreateOrderService<S, S, S>,
    pub customers: CustomerService<S>,
    pub products: ProductService<S>,
    pub backend: &'static str,
}

impl<S: Store> AppState<S> {
    /// Wires every service to the same store.
    pub fn new(store: S) -> Arc<Self> {
        Arc::new(Self {
            orders: CreateOrderService::new(store.clone(), store.clone(), store.clone()),
            customers: CustomerService::new(store.clone()),
            products: ProductService::new(store.clone()),
            backend: store.backend(),
        })
    }
}
