use async_trait::async_trait;

use crate::{
    Customer, CustomerId, NewCustomer, NewOrder, NewProduct, Order, OrderId, Product, ProductId,
    Result, StockUpdate,
};

/// Storage for customer records.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Persists a new customer and returns it with its generated id.
    async fn create(&self, customer: NewCustomer) -> Result<Customer>;

    /// Looks up a customer, returning None if it doesn't exist.
    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>>;
}

/// Storage for catalog products and their stock levels.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Persists a new product and returns it with its generated id.
    async fn create(&self, product: NewProduct) -> Result<Product>;

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>>;

    /// Loads every product whose id appears in `ids`.
    ///
    /// Unknown ids are silently dropped and the result carries no ordering
    /// guarantee. Each product appears at most once even if its id is
    /// repeated in the input.
    async fn find_all_by_id(&self, ids: &[ProductId]) -> Result<Vec<Product>>;

    /// Overwrites the stock level of each listed product.
    ///
    /// The batch is applied atomically: if any product is missing, none of
    /// the updates take effect. Returns the updated products.
    async fn update_quantity(&self, updates: Vec<StockUpdate>) -> Result<Vec<Product>>;
}

/// Storage for placed orders.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persists an order with all its line items and assigns its id.
    async fn create(&self, order: NewOrder) -> Result<Order>;

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>>;
}
