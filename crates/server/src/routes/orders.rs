//! Order route handlers.
//!
//! All order reads are scoped to the caller: an order that exists but
//! belongs to someone else is indistinguishable from one that doesn't.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crescendo_core::{OrderId, PaymentMethod};

use crate::db::orders::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{Order, OrderLineDetail};
use crate::services::checkout::{CartItem, CheckoutService};
use crate::state::AppState;

/// Order submission body.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub delivery_address: String,
}

/// `POST /api/orders` - place an order.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let placed = CheckoutService::new(state.pool(), state.stock_policy())
        .place_order(
            &caller,
            &request.items,
            request.payment_method,
            &request.delivery_address,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Order created successfully",
            "order_id": placed.order_id,
            "status": placed.status
        })),
    ))
}

/// `GET /api/orders/{id}` - order header plus joined line items.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<Json<Value>> {
    let repository = OrderRepository::new(state.pool());

    let order = repository
        .get_for_user(id, caller.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    let items = repository.lines_with_products(id).await?;

    Ok(Json(json!({ "order": order, "items": items })))
}

/// `GET /api/user/orders` - the caller's orders, newest first.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(caller.id)
        .await?;

    Ok(Json(orders))
}

/// `GET /api/user/orders/{id}/items` - line items for one owned order.
pub async fn items(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<Json<Vec<OrderLineDetail>>> {
    let repository = OrderRepository::new(state.pool());

    // Verify ownership before exposing line items
    repository
        .get_for_user(id, caller.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    let items = repository.lines_with_products(id).await?;

    Ok(Json(items))
}
