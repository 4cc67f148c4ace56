//! HTTP API server for the order-management backend.
//!
//! Exposes customer, product and order endpoints over axum, with structured
//! logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use store::{
    CustomerRepository, InMemoryStore, OrderRepository, PostgresStore, ProductRepository,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use routes::AppState;

/// A storage backend that can serve every route.
pub trait Store:
    CustomerRepository + ProductRepository + OrderRepository + Clone + 'static
{
    /// Short name reported by the health endpoint.
    fn backend(&self) -> &'static str;
}

impl Store for InMemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }
}

impl Store for PostgresStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: Store>(state: Arc<AppState<S>>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::system::metrics))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::system::health::<S>))
        .route("/customers", post(routes::customers::create::<S>))
        .route("/customers/{id}", get(routes::customers::get::<S>))
        .route("/products", post(routes::products::create::<S>))
        .route("/products/{id}", get(routes::products::get::<S>))
        .route("/orders", post(routes::orders::create::<S>))
        .route("/orders/{id}", get(routes::orders::get::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
