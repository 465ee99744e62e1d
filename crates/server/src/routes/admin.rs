//! Admin route handlers.
//!
//! Every handler here requires the caller's admin flag via `RequireAdmin`.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

use crescendo_core::ProductId;

use crate::db::products::ProductRepository;
use crate::db::sales::{InventoryRow, SalesRepository, SalesRow};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{NewProduct, Product};
use crate::state::AppState;

/// `GET /api/admin/sales-data` - per-product sales aggregates, best sellers first.
pub async fn sales_data(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<SalesRow>>> {
    let rows = SalesRepository::new(state.pool()).sales_by_product().await?;
    Ok(Json(rows))
}

/// `GET /api/admin/inventory` - full catalog with stock and sales totals.
pub async fn inventory(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<InventoryRow>>> {
    let rows = SalesRepository::new(state.pool()).inventory_report().await?;
    Ok(Json(rows))
}

/// `POST /api/admin/products` - add a product to the catalog.
pub async fn create_product(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(product): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>)> {
    let created = ProductRepository::new(state.pool()).create(&product).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /api/admin/products/{id}` - replace a product's editable fields.
pub async fn update_product(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
    Json(product): Json<NewProduct>,
) -> Result<Json<Value>> {
    let updated = ProductRepository::new(state.pool()).update(id, &product).await?;
    if !updated {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    Ok(Json(json!({ "message": "Product updated successfully" })))
}

/// `DELETE /api/admin/products/{id}` - remove a product.
pub async fn delete_product(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<Json<Value>> {
    let deleted = ProductRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    Ok(Json(json!({ "message": "Product deleted successfully" })))
}
