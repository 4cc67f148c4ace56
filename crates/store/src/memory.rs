use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    Customer, CustomerId, CustomerRepository, NewCustomer, NewOrder, NewProduct, Order, OrderId,
    OrderRepository, Product, ProductId, ProductRepository, Result, StockUpdate, StoreError,
};

#[derive(Debug, Default)]
struct InMemoryState {
    customers: HashMap<CustomerId, Customer>,
    products: HashMap<ProductId, Product>,
    orders: HashMap<OrderId, Order>,
    order_writes: usize,
    stock_writes: usize,
    fail_on_create_order: bool,
    fail_on_update_quantity: bool,
}

/// In-memory store implementing every repository trait.
///
/// Clones share the same underlying state, so one instance can be handed to
/// several services. Failure switches let tests simulate an unavailable
/// backend for individual operations.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<InMemoryState>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a customer with a caller-chosen id.
    pub async fn insert_customer(&self, customer: Customer) {
        self.state
            .write()
            .await
            .customers
            .insert(customer.id.clone(), customer);
    }

    /// Inserts or replaces a product with a caller-chosen id.
    pub async fn insert_product(&self, product: Product) {
        self.state
            .write()
            .await
            .products
            .insert(product.id.clone(), product);
    }

    /// Returns the current stock level of a product.
    pub async fn stock_of(&self, id: &ProductId) -> Option<u32> {
        self.state.read().await.products.get(id).map(|p| p.quantity)
    }

    /// Returns the number of persisted orders.
    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }

    /// Number of calls that reached `OrderRepository::create`.
    pub async fn order_writes(&self) -> usize {
        self.state.read().await.order_writes
    }

    /// Number of calls that reached `ProductRepository::update_quantity`.
    pub async fn stock_writes(&self) -> usize {
        self.state.read().await.stock_writes
    }

    /// Makes subsequent order creations fail.
    pub async fn set_fail_on_create_order(&self, fail: bool) {
        self.state.write().await.fail_on_create_order = fail;
    }

    /// Makes subsequent stock updates fail.
    pub async fn set_fail_on_update_quantity(&self, fail: bool) {
        self.state.write().await.fail_on_update_quantity = fail;
    }

    /// Clears all records and counters.
    pub async fn clear(&self) {
        *self.state.write().await = InMemoryState::default();
    }
}

#[async_trait]
impl CustomerRepository for InMemoryStore {
    async fn create(&self, customer: NewCustomer) -> Result<Customer> {
        let mut state = self.state.write().await;
        if state.customers.values().any(|c| c.email == customer.email) {
            return Err(StoreError::Duplicate {
                entity: "customer",
                field: "email",
                value: customer.email,
            });
        }

        let customer = Customer::new(CustomerId::generate(), customer.name, customer.email);
        state.customers.insert(customer.id.clone(), customer.clone());
        Ok(customer)
    }

    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>> {
        Ok(self.state.read().await.customers.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>> {
        let state = self.state.read().await;
        Ok(state.customers.values().find(|c| c.email == email).cloned())
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn create(&self, product: NewProduct) -> Result<Product> {
        let mut state = self.state.write().await;
        if state.products.values().any(|p| p.name == product.name) {
            return Err(StoreError::Duplicate {
                entity: "product",
                field: "name",
                value: product.name,
            });
        }

        let product = Product::new(
            ProductId::generate(),
            product.name,
            product.price,
            product.quantity,
        );
        state.products.insert(product.id.clone(), product.clone());
        Ok(product)
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>> {
        Ok(self.state.read().await.products.get(id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>> {
        let state = self.state.read().await;
        Ok(state.products.values().find(|p| p.name == name).cloned())
    }

    async fn find_all_by_id(&self, ids: &[ProductId]) -> Result<Vec<Product>> {
        let state = self.state.read().await;
        let mut seen = HashSet::new();
        Ok(ids
            .iter()
            .filter(|id| seen.insert(*id))
            .filter_map(|id| state.products.get(id).cloned())
            .collect())
    }

    async fn update_quantity(&self, updates: Vec<StockUpdate>) -> Result<Vec<Product>> {
        let mut state = self.state.write().await;
        state.stock_writes += 1;

        if state.fail_on_update_quantity {
            return Err(StoreError::Unavailable(
                "stock update rejected".to_string(),
            ));
        }

        // Check the whole batch before touching anything.
        if let Some(missing) = updates
            .iter()
            .find(|u| !state.products.contains_key(&u.id))
        {
            return Err(StoreError::NotFound {
                entity: "Product",
                id: missing.id.to_string(),
            });
        }

        let now = Utc::now();
        let mut updated = Vec::with_capacity(updates.len());
        for update in updates {
            if let Some(product) = state.products.get_mut(&update.id) {
                product.quantity = update.quantity;
                product.updated_at = now;
                updated.push(product.clone());
            }
        }

        Ok(updated)
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn create(&self, order: NewOrder) -> Result<Order> {
        let mut state = self.state.write().await;
        state.order_writes += 1;

        if state.fail_on_create_order {
            return Err(StoreError::Unavailable("order insert rejected".to_string()));
        }

        let now = Utc::now();
        let order = Order {
            id: OrderId::new(),
            customer: order.customer,
            products: order.products,
            created_at: now,
            updated_at: now,
        };
        state.orders.insert(order.id, order.clone());

        Ok(order)
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>> {
        Ok(self.state.read().await.orders.get(&id).cloned())
    }
}
