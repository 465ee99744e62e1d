//! Crescendo storefront API library.
//!
//! This crate provides the storefront backend as a library, allowing it to
//! be tested end-to-end without a running process.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod seed;
pub mod services;
pub mod state;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application with sessions, tracing, and CORS applied.
///
/// # Errors
///
/// Returns `sqlx::Error` if the session store table cannot be created.
pub async fn build_app(state: AppState) -> Result<Router, sqlx::Error> {
    let session_store = middleware::create_session_store(state.pool()).await?;
    let session_layer = middleware::create_session_layer(session_store);

    let app = routes::routes()
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    Ok(app)
}
