//! Order placement and lookup endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::OrderId;
use domain::{CreateOrder, LineItemRequest};
use serde::{Deserialize, Serialize};
use store::{Order, PricedLineItem};

use super::AppState;
use super::customers::CustomerResponse;
use crate::Store;
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: String,
    pub products: Vec<LineItemRequest>,
}

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub customer: CustomerResponse,
    pub products: Vec<OrderProductResponse>,
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct OrderProductResponse {
    pub product_id: String,
    pub quantity: u32,
    pub price_cents: i64,
}

impl From<PricedLineItem> for OrderProductResponse {
    fn from(line: PricedLineItem) -> Self {
        Self {
            product_id: line.product_id.to_string(),
            quantity: line.quantity,
            price_cents: line.price.cents(),
        }
    }
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        let total_cents = order.total().cents();
        Self {
            id: order.id.to_string(),
            customer: order.customer.into(),
            products: order.products.into_iter().map(Into::into).collect(),
            total_cents,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

/// POST /orders — validate and place an order, decrementing stock.
#[tracing::instrument(skip(state, req), fields(customer_id = %req.customer_id))]
pub async fn create<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let order = state
        .orders
        .execute(CreateOrder::new(req.customer_id, req.products))
        .await?;

    Ok((StatusCode::CREATED, Json(order.into())))
}

/// GET /orders/:id — load a placed order.
#[tracing::instrument(skip(state))]
pub async fn get<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id: OrderId = id
        .parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))?;

    let order = state.orders.find_order(order_id).await?;
    Ok(Json(order.into()))
}
