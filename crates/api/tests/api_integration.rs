//! Integration tests for the API server.

use std::sync::OnceLock;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{Money, ProductId};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{Value, json};
use store::{Customer, InMemoryStore, Product};
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup_with_store(store: InMemoryStore) -> axum::Router {
    api::create_app(api::AppState::new(store), get_metrics_handle())
}

/// Store seeded with customer C1 and products P1 ($10.00, 10 units) and
/// P2 ($20.00, 2 units).
async fn seeded_store() -> InMemoryStore {
    let store = InMemoryStore::new();
    store
        .insert_customer(Customer::new("C1", "Ada", "ada@example.com"))
        .await;
    store
        .insert_product(Product::new("P1", "Keyboard", Money::from_cents(1000), 10))
        .await;
    store
        .insert_product(Product::new("P2", "Mouse", Money::from_cents(2000), 2))
        .await;
    store
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    (status, json)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = setup_with_store(InMemoryStore::new());

    let (status, json) = send(app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["storage"], "memory");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = setup_with_store(InMemoryStore::new());

    let response = app.oneshot(get("/metrics")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_and_get_customer() {
    let store = InMemoryStore::new();

    let (status, created) = send(
        setup_with_store(store.clone()),
        post_json(
            "/customers",
            json!({ "name": "Grace", "email": "grace@example.com" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Grace");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, loaded) = send(setup_with_store(store), get(&format!("/customers/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(loaded["email"], "grace@example.com");
}

#[tokio::test]
async fn test_duplicate_email_conflict() {
    let store = seeded_store().await;

    let (status, json) = send(
        setup_with_store(store),
        post_json(
            "/customers",
            json!({ "name": "Other Ada", "email": "ada@example.com" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["error"].as_str().unwrap().contains("ada@example.com"));
}

#[tokio::test]
async fn test_blank_customer_fields_rejected() {
    let app = setup_with_store(InMemoryStore::new());

    let (status, _) = send(
        app,
        post_json("/customers", json!({ "name": " ", "email": "x@example.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_customer_not_found() {
    let app = setup_with_store(InMemoryStore::new());

    let (status, _) = send(app, get("/customers/C404")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_and_get_product() {
    let store = InMemoryStore::new();

    let (status, created) = send(
        setup_with_store(store.clone()),
        post_json(
            "/products",
            json!({ "name": "Monitor", "price_cents": 15000, "quantity": 4 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["price_cents"], 15000);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, loaded) = send(setup_with_store(store), get(&format!("/products/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(loaded["name"], "Monitor");
    assert_eq!(loaded["quantity"], 4);
}

#[tokio::test]
async fn test_negative_price_rejected() {
    let app = setup_with_store(InMemoryStore::new());

    let (status, _) = send(
        app,
        post_json(
            "/products",
            json!({ "name": "Refund", "price_cents": -1, "quantity": 1 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_order_decrements_stock() {
    let store = seeded_store().await;

    let (status, json) = send(
        setup_with_store(store.clone()),
        post_json(
            "/orders",
            json!({
                "customer_id": "C1",
                "products": [
                    { "id": "P1", "quantity": 3 },
                    { "id": "P2", "quantity": 2 }
                ]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["customer"]["id"], "C1");
    assert_eq!(json["products"][0]["product_id"], "P1");
    assert_eq!(json["products"][0]["quantity"], 3);
    assert_eq!(json["products"][0]["price_cents"], 1000);
    assert_eq!(json["products"][1]["product_id"], "P2");
    assert_eq!(json["products"][1]["price_cents"], 2000);
    assert_eq!(json["total_cents"], 7000);

    assert_eq!(store.stock_of(&ProductId::new("P1")).await, Some(7));
    assert_eq!(store.stock_of(&ProductId::new("P2")).await, Some(0));

    let id = json["id"].as_str().unwrap().to_string();
    let (status, loaded) = send(setup_with_store(store), get(&format!("/orders/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(loaded["products"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_insufficient_stock_rejected() {
    let store = seeded_store().await;

    let (status, json) = send(
        setup_with_store(store.clone()),
        post_json(
            "/orders",
            json!({ "customer_id": "C1", "products": [{ "id": "P2", "quantity": 5 }] }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["error"],
        "The quantity 5 is not available for product P2 (available: 2)"
    );
    assert_eq!(store.stock_of(&ProductId::new("P2")).await, Some(2));
    assert_eq!(store.order_count().await, 0);
}

#[tokio::test]
async fn test_unknown_products_rejected() {
    let store = seeded_store().await;

    let (status, json) = send(
        setup_with_store(store),
        post_json(
            "/orders",
            json!({
                "customer_id": "C1",
                "products": [
                    { "id": "P1", "quantity": 1 },
                    { "id": "P3", "quantity": 1 },
                    { "id": "P4", "quantity": 1 }
                ]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Could not find products: P3, P4");
}

#[tokio::test]
async fn test_unknown_customer_rejected() {
    let store = seeded_store().await;

    let (status, _) = send(
        setup_with_store(store),
        post_json(
            "/orders",
            json!({ "customer_id": "C9", "products": [{ "id": "P1", "quantity": 1 }] }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_order_rejected() {
    let store = seeded_store().await;

    let (status, json) = send(
        setup_with_store(store),
        post_json("/orders", json!({ "customer_id": "C1", "products": [] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Inform at least one existing product");
}

#[tokio::test]
async fn test_order_total_overflow_rejected_without_writes() {
    let store = seeded_store().await;
    store
        .insert_product(Product::new(
            "P9",
            "Yacht",
            Money::from_cents(i64::MAX / 2 + 1),
            5,
        ))
        .await;

    let (status, json) = send(
        setup_with_store(store.clone()),
        post_json(
            "/orders",
            json!({ "customer_id": "C1", "products": [{ "id": "P9", "quantity": 2 }] }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("too large"));
    assert_eq!(store.order_count().await, 0);
    assert_eq!(store.stock_of(&ProductId::new("P9")).await, Some(5));
}

#[tokio::test]
async fn test_zero_quantity_rejected() {
    let store = seeded_store().await;

    let (status, json) = send(
        setup_with_store(store.clone()),
        post_json(
            "/orders",
            json!({
                "customer_id": "C9",
                "products": [
                    { "id": "P1", "quantity": 1 },
                    { "id": "P4", "quantity": 0 }
                ]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["error"],
        "Invalid quantity for product P4 (must be greater than 0)"
    );
    assert_eq!(store.order_count().await, 0);
}

#[tokio::test]
async fn test_store_failure_is_internal_error() {
    let store = seeded_store().await;
    store.set_fail_on_create_order(true).await;

    let (status, json) = send(
        setup_with_store(store),
        post_json(
            "/orders",
            json!({ "customer_id": "C1", "products": [{ "id": "P1", "quantity": 1 }] }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Internal server error");
}

#[tokio::test]
async fn test_get_unknown_order_not_found() {
    let app = setup_with_store(InMemoryStore::new());

    let (status, _) = send(
        app,
        get("/orders/00000000-0000-0000-0000-000000000000"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_order_with_invalid_id() {
    let app = setup_with_store(InMemoryStore::new());

    let (status, _) = send(app, get("/orders/not-a-uuid")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
