//! Order service running the order-creation workflow.

use std::time::Instant;

use common::OrderId;
use store::{CustomerRepository, NewOrder, Order, OrderRepository, ProductRepository};

use crate::error::DomainError;

use super::{CreateOrder, compute_stock_updates, price_line_items, validator};

/// Places orders against a customer store, a product catalog and an order
/// store.
///
/// The workflow is a straight pipeline of awaited repository calls:
/// quantity check, customer lookup, catalog lookup, validation, order insert,
/// stock update.
/// Stock levels are read once and the remainder is written back without a
/// re-check, so two concurrent orders for the same product can both pass
/// validation against the same snapshot.
pub struct CreateOrderService<C, P, O>
where
    C: CustomerRepository,
    P: ProductRepository,
    O: OrderRepository,
{
    customers: C,
    products: P,
    orders: O,
}

impl<C, P, O> CreateOrderService<C, P, O>
where
    C: CustomerRepository,
    P: ProductRepository,
    O: OrderRepository,
{
    /// Creates a new order service over the given repositories.
    pub fn new(customers: C, products: P, orders: O) -> Self {
        Self {
            customers,
            products,
            orders,
        }
    }

    /// Validates and places an order, then decrements stock.
    ///
    /// Rejections carry the first failing check only. Nothing is written
    /// unless validation passes. If the stock update fails after the order
    /// was inserted the store error is returned and the order stays.
    #[tracing::instrument(
        skip(self, cmd),
        fields(customer_id = %cmd.customer_id, lines = cmd.products.len())
    )]
    pub async fn execute(&self, cmd: CreateOrder) -> Result<Order, DomainError> {
        let started = Instant::now();
        let result = self.place(cmd).await;

        match &result {
            Ok(order) => {
                metrics::counter!("orders_created_total").increment(1);
                metrics::histogram!("order_creation_duration_seconds")
                    .record(started.elapsed().as_secs_f64());
                tracing::info!(order_id = %order.id, total = %order.total(), "order created");
            }
            Err(DomainError::Order(rejection)) => {
                metrics::counter!("orders_rejected_total", "reason" => rejection.reason())
                    .increment(1);
                tracing::info!(reason = rejection.reason(), %rejection, "order rejected");
            }
            Err(e) => {
                tracing::warn!(error = %e, "order creation failed");
            }
        }

        result
    }

    async fn place(&self, cmd: CreateOrder) -> Result<Order, DomainError> {
        validator::validate_quantities(&cmd.products)?;

        let customer = self.customers.find_by_id(&cmd.customer_id).await?;
        let customer = validator::validate_customer(&cmd, customer.as_ref())?.clone();

        let found = self.products.find_all_by_id(&cmd.product_ids()).await?;
        validator::validate_products(&cmd.products, &found)?;

        let products = price_line_items(&cmd.products, &found);
        let order = self.orders.create(NewOrder { customer, products }).await?;

        let updates = compute_stock_updates(&cmd.products, &found);
        if let Err(e) = self.products.update_quantity(updates).await {
            tracing::error!(order_id = %order.id, error = %e, "order persisted but stock update failed");
            return Err(e.into());
        }

        Ok(order)
    }

    /// Loads a placed order by id.
    #[tracing::instrument(skip(self))]
    pub async fn find_order(&self, order_id: OrderId) -> Result<Order, DomainError> {
        self.orders
            .find_by_id(order_id)
            .await?
            .ok_or(DomainError::OrderNotFound(order_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{LineItemRequest, OrderError};
    use common::{Money, ProductId};
    use store::{Customer, InMemoryStore, PricedLineItem, Product, StoreError};

    type Service = CreateOrderService<InMemoryStore, InMemoryStore, InMemoryStore>;

    async fn setup() -> (Service, InMemoryStore) {
        let store = InMemoryStore::new();
        store
            .insert_customer(Customer::new("C1", "Ada", "ada@example.com"))
            .await;
        store
            .insert_product(Product::new("P1", "Widget", Money::from_cents(1000), 5))
            .await;
        store
            .insert_product(Product::new("P2", "Gadget", Money::from_cents(2000), 2))
            .await;
        let service = CreateOrderService::new(store.clone(), store.clone(), store.clone());
        (service, store)
    }

    fn order(lines: &[(&str, u32)]) -> CreateOrder {
        CreateOrder::new(
            "C1",
            lines
                .iter()
                .map(|(id, qty)| LineItemRequest::new(*id, *qty))
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_execute_places_order_and_decrements_stock() {
        let (service, store) = setup().await;

        let placed = service
            .execute(order(&[("P1", 3), ("P2", 1)]))
            .await
            .unwrap();

        assert_eq!(placed.customer.id.as_str(), "C1");
        assert_eq!(
            placed.products,
            vec![
                PricedLineItem::new("P1", 3, Money::from_cents(1000)),
                PricedLineItem::new("P2", 1, Money::from_cents(2000)),
            ]
        );
        assert_eq!(store.stock_of(&ProductId::new("P1")).await, Some(2));
        assert_eq!(store.stock_of(&ProductId::new("P2")).await, Some(1));
    }

    #[tokio::test]
    async fn test_insufficient_stock_writes_nothing() {
        let (service, store) = setup().await;

        let err = service.execute(order(&[("P2", 5)])).await.unwrap_err();

        assert!(matches!(
            err,
            DomainError::Order(OrderError::InsufficientStock { available: 2, .. })
        ));
        assert_eq!(store.order_writes().await, 0);
        assert_eq!(store.stock_writes().await, 0);
    }

    #[tokio::test]
    async fn test_zero_quantity_rejected_before_any_lookup() {
        let (service, store) = setup().await;

        let unknown_product = service
            .execute(order(&[("P9", 0), ("P1", 1)]))
            .await
            .unwrap_err();
        let unknown_customer = service
            .execute(CreateOrder::new("C9", vec![LineItemRequest::new("P1", 0)]))
            .await
            .unwrap_err();

        assert!(matches!(
            unknown_product,
            DomainError::Order(OrderError::InvalidQuantity { ref product_id }) if product_id.as_str() == "P9"
        ));
        assert!(matches!(
            unknown_customer,
            DomainError::Order(OrderError::InvalidQuantity { .. })
        ));
        assert_eq!(store.order_writes().await, 0);
    }

    #[tokio::test]
    async fn test_overflowing_total_writes_nothing() {
        let (service, store) = setup().await;
        store
            .insert_product(Product::new(
                "P3",
                "Yacht",
                Money::from_cents(i64::MAX / 2 + 1),
                5,
            ))
            .await;

        let err = service.execute(order(&[("P3", 2)])).await.unwrap_err();

        assert!(matches!(
            err,
            DomainError::Order(OrderError::TotalTooLarge { .. })
        ));
        assert_eq!(store.order_writes().await, 0);
        assert_eq!(store.stock_of(&ProductId::new("P3")).await, Some(5));
    }

    #[tokio::test]
    async fn test_stock_failure_leaves_order_persisted() {
        let (service, store) = setup().await;
        store.set_fail_on_update_quantity(true).await;

        let err = service.execute(order(&[("P1", 1)])).await.unwrap_err();

        assert!(matches!(err, DomainError::Store(StoreError::Unavailable(_))));
        assert_eq!(store.order_count().await, 1);
        assert_eq!(store.stock_of(&ProductId::new("P1")).await, Some(5));
    }

    #[tokio::test]
    async fn test_order_insert_failure_skips_stock_update() {
        let (service, store) = setup().await;
        store.set_fail_on_create_order(true).await;

        let err = service.execute(order(&[("P1", 1)])).await.unwrap_err();

        assert!(matches!(err, DomainError::Store(_)));
        assert_eq!(store.stock_writes().await, 0);
    }

    #[tokio::test]
    async fn test_find_order() {
        let (service, _store) = setup().await;
        let placed = service.execute(order(&[("P1", 1)])).await.unwrap();

        let loaded = service.find_order(placed.id).await.unwrap();
        assert_eq!(loaded, placed);

        let missing = service.find_order(OrderId::new()).await;
        assert!(matches!(missing, Err(DomainError::OrderNotFound(_))));
    }
}
