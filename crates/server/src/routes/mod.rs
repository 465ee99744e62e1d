//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (DB ping)
//!
//! # Catalog
//! GET  /api/products                - Product listing (category/price/search filters)
//! GET  /api/products/{id}           - Product detail
//!
//! # Auth
//! POST /api/auth/register           - Create an account
//! POST /api/auth/login              - Login (sets session)
//! POST /api/auth/logout             - Logout
//! GET  /api/auth/status             - Current session info
//!
//! # Orders (requires auth)
//! POST /api/orders                  - Place an order (the atomic unit of work)
//! GET  /api/orders/{id}             - Order header plus joined line items
//! GET  /api/user/orders             - Caller's orders, newest first
//! GET  /api/user/orders/{id}/items  - Ownership-checked line items
//!
//! # Admin (requires admin flag)
//! GET    /api/admin/sales-data      - Per-product sales aggregates
//! GET    /api/admin/inventory       - Catalog with stock and sales totals
//! POST   /api/admin/products        - Create product
//! PUT    /api/admin/products/{id}   - Replace product
//! DELETE /api/admin/products/{id}   - Delete product
//! ```

pub mod admin;
pub mod auth;
pub mod orders;
pub mod products;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the full application router (no layers applied).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .route("/api/products", get(products::index))
        .route("/api/products/{id}", get(products::show))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/status", get(auth::status))
        .route("/api/orders", post(orders::create))
        .route("/api/orders/{id}", get(orders::show))
        .route("/api/user/orders", get(orders::index))
        .route("/api/user/orders/{id}/items", get(orders::items))
        .route("/api/admin/sales-data", get(admin::sales_data))
        .route("/api/admin/inventory", get(admin::inventory))
        .route("/api/admin/products", post(admin::create_product))
        .route(
            "/api/admin/products/{id}",
            put(admin::update_product).delete(admin::delete_product),
        )
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
