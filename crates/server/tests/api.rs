//! HTTP surface tests.
//!
//! Drive the full router (sessions included) with in-process requests and
//! assert on status codes and JSON bodies.

mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use sqlx::SqlitePool;
use tower::ServiceExt;

use crescendo_server::build_app;
use crescendo_server::config::ServerConfig;
use crescendo_server::state::AppState;

async fn app(pool: SqlitePool) -> Router {
    let state = AppState::new(ServerConfig::default(), pool);
    build_app(state).await.expect("build app")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .expect("request")
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn post_json_with_cookie(uri: &str, cookie: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, cookie)
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

/// Register an account and return its session cookie.
async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/register",
            &json!({
                "username": username,
                "email": format!("{username}@example.com"),
                "password": password,
            }),
        ))
        .await
        .expect("register");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            &json!({ "username": username, "password": password }),
        ))
        .await
        .expect("login");
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie")
        .to_str()
        .expect("cookie str");
    set_cookie
        .split(';')
        .next()
        .expect("cookie value")
        .to_string()
}

#[tokio::test]
async fn health_endpoints_respond() {
    let pool = common::test_pool().await;
    let app = app(pool).await;

    let response = app.clone().oneshot(get("/health")).await.expect("health");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/health/ready")).await.expect("ready");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn catalog_listing_and_detail() {
    let pool = common::test_pool().await;
    let guitar = common::insert_product(&pool, "Test Guitar", "1299.99", 15).await;
    common::insert_product(&pool, "Test Piano", "649.99", 8).await;
    let app = app(pool).await;

    let response = app
        .clone()
        .oneshot(get("/api/products"))
        .await
        .expect("list");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().expect("array").len(), 2);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/products/{guitar}")))
        .await
        .expect("detail");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["name"], "Test Guitar");
    assert_eq!(body["price"], "1299.99");

    let response = app.oneshot(get("/api/products/9999")).await.expect("missing");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn catalog_search_filters_by_name() {
    let pool = common::test_pool().await;
    common::insert_product(&pool, "Fender Stratocaster", "1299.99", 15).await;
    common::insert_product(&pool, "Yamaha Flute", "549.99", 7).await;
    let app = app(pool).await;

    let response = app
        .oneshot(get("/api/products?search=strat"))
        .await
        .expect("search");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let products = body.as_array().expect("array");
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["name"], "Fender Stratocaster");
}

#[tokio::test]
async fn order_placement_requires_login() {
    let pool = common::test_pool().await;
    let product = common::insert_product(&pool, "Amp", "229.99", 6).await;
    let app = app(pool).await;

    let response = app
        .oneshot(post_json(
            "/api/orders",
            &json!({ "items": [{ "id": product, "quantity": 1, "price": "229.99" }] }),
        ))
        .await
        .expect("order");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn full_checkout_flow_over_http() {
    let pool = common::test_pool().await;
    let strings = common::insert_product(&pool, "Strings", "19.99", 50).await;
    let mic = common::insert_product(&pool, "Mic", "99.99", 25).await;
    let app = app(pool.clone()).await;

    let cookie = login(&app, "clara", "correct horse battery").await;

    let response = app
        .clone()
        .oneshot(post_json_with_cookie(
            "/api/orders",
            &cookie,
            &json!({
                "items": [
                    { "id": strings, "quantity": 3, "price": "19.99" },
                    { "id": mic, "quantity": 1, "price": "99.99" },
                ],
                "payment_method": "card",
                "delivery_address": "12 Bond St",
            }),
        ))
        .await
        .expect("place order");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let order_id = body["order_id"].as_i64().expect("order id");
    assert_eq!(body["status"], "pending");

    // Stock moved
    assert_eq!(common::stock_of(&pool, strings).await, 47);

    // Order visible to its owner, newest first
    let response = app
        .clone()
        .oneshot(get_with_cookie("/api/user/orders", &cookie))
        .await
        .expect("list orders");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let orders = body.as_array().expect("array");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["total_amount"], "159.96");

    // Detail includes joined line items
    let response = app
        .clone()
        .oneshot(get_with_cookie(&format!("/api/orders/{order_id}"), &cookie))
        .await
        .expect("order detail");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["items"].as_array().expect("items").len(), 2);
    assert_eq!(body["items"][0]["price"], "19.99");
}

#[tokio::test]
async fn empty_cart_is_a_bad_request() {
    let pool = common::test_pool().await;
    let app = app(pool).await;
    let cookie = login(&app, "clara", "correct horse battery").await;

    let response = app
        .oneshot(post_json_with_cookie(
            "/api/orders",
            &cookie,
            &json!({ "items": [] }),
        ))
        .await
        .expect("order");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "no items in order");
}

#[tokio::test]
async fn orders_are_invisible_to_other_users() {
    let pool = common::test_pool().await;
    let product = common::insert_product(&pool, "Violin", "299.99", 12).await;
    let app = app(pool).await;

    let owner_cookie = login(&app, "owner", "correct horse battery").await;
    let other_cookie = login(&app, "other", "correct horse battery").await;

    let response = app
        .clone()
        .oneshot(post_json_with_cookie(
            "/api/orders",
            &owner_cookie,
            &json!({ "items": [{ "id": product, "quantity": 1, "price": "299.99" }] }),
        ))
        .await
        .expect("place order");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let order_id = body["order_id"].as_i64().expect("order id");

    // Existing-but-foreign orders look exactly like missing ones
    let response = app
        .clone()
        .oneshot(get_with_cookie(&format!("/api/orders/{order_id}"), &other_cookie))
        .await
        .expect("foreign order");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(get_with_cookie(
            &format!("/api/user/orders/{order_id}/items"),
            &other_cookie,
        ))
        .await
        .expect("foreign items");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let pool = common::test_pool().await;
    let app = app(pool).await;

    let request = json!({
        "username": "clara",
        "email": "clara@example.com",
        "password": "correct horse battery",
    });
    let response = app
        .clone()
        .oneshot(post_json("/api/auth/register", &request))
        .await
        .expect("register");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(post_json("/api/auth/register", &request))
        .await
        .expect("register again");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let pool = common::test_pool().await;
    let app = app(pool).await;
    let _cookie = login(&app, "clara", "correct horse battery").await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            &json!({ "username": "clara", "password": "wrong password" }),
        ))
        .await
        .expect("login");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let wrong_password_body = body_json(response).await;

    // An unknown username is indistinguishable from a wrong password
    let response = app
        .oneshot(post_json(
            "/api/auth/login",
            &json!({ "username": "nobody", "password": "wrong password" }),
        ))
        .await
        .expect("login");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await, wrong_password_body);
}

#[tokio::test]
async fn auth_status_tracks_the_session() {
    let pool = common::test_pool().await;
    let app = app(pool).await;

    let response = app
        .clone()
        .oneshot(get("/api/auth/status"))
        .await
        .expect("status");
    let body = body_json(response).await;
    assert_eq!(body["logged_in"], false);

    let cookie = login(&app, "clara", "correct horse battery").await;
    let response = app
        .clone()
        .oneshot(get_with_cookie("/api/auth/status", &cookie))
        .await
        .expect("status");
    let body = body_json(response).await;
    assert_eq!(body["logged_in"], true);
    assert_eq!(body["username"], "clara");

    // Logout invalidates the session
    let response = app
        .clone()
        .oneshot(post_json_with_cookie(
            "/api/auth/logout",
            &cookie,
            &json!({}),
        ))
        .await
        .expect("logout");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_with_cookie("/api/auth/status", &cookie))
        .await
        .expect("status");
    let body = body_json(response).await;
    assert_eq!(body["logged_in"], false);
}

#[tokio::test]
async fn admin_routes_enforce_the_admin_flag() {
    let pool = common::test_pool().await;
    let app = app(pool.clone()).await;

    let response = app
        .clone()
        .oneshot(get("/api/admin/inventory"))
        .await
        .expect("anonymous");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let cookie = login(&app, "regular", "correct horse battery").await;
    let response = app
        .clone()
        .oneshot(get_with_cookie("/api/admin/inventory", &cookie))
        .await
        .expect("regular user");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Promote a second account and log in after the flag is set
    login(&app, "boss", "correct horse battery").await;
    sqlx::query("UPDATE users SET is_admin = 1 WHERE username = ?")
        .bind("boss")
        .execute(&pool)
        .await
        .expect("promote");
    let admin_cookie = login_existing(&app, "boss", "correct horse battery").await;

    let response = app
        .oneshot(get_with_cookie("/api/admin/inventory", &admin_cookie))
        .await
        .expect("admin");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn admin_manages_the_catalog_and_reads_sales() {
    let pool = common::test_pool().await;
    let product = common::insert_product(&pool, "Pedal", "149.99", 10).await;
    let app = app(pool.clone()).await;

    login(&app, "boss", "correct horse battery").await;
    sqlx::query("UPDATE users SET is_admin = 1 WHERE username = ?")
        .bind("boss")
        .execute(&pool)
        .await
        .expect("promote");
    let admin_cookie = login_existing(&app, "boss", "correct horse battery").await;

    // Create
    let response = app
        .clone()
        .oneshot(post_json_with_cookie(
            "/api/admin/products",
            &admin_cookie,
            &json!({
                "name": "New Capo",
                "category": "Accessories",
                "brand": "TestBrand",
                "price": "12.50",
                "description": "Spring capo",
                "image_url": "https://images.example.com/capo.jpg",
            }),
        ))
        .await
        .expect("create product");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["name"], "New Capo");
    assert_eq!(body["stock"], 10); // default
    let capo_id = body["id"].as_i64().expect("product id");

    // A sale shows up in the sales report
    let buyer_cookie = login(&app, "buyer", "correct horse battery").await;
    let response = app
        .clone()
        .oneshot(post_json_with_cookie(
            "/api/orders",
            &buyer_cookie,
            &json!({ "items": [{ "id": product, "quantity": 2, "price": "149.99" }] }),
        ))
        .await
        .expect("place order");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(get_with_cookie("/api/admin/sales-data", &admin_cookie))
        .await
        .expect("sales data");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let rows = body.as_array().expect("array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["quantity_sold"], 2);
    assert_eq!(rows[0]["total_revenue"], "299.98");

    // Delete the unsold product (sold ones are referenced by order lines)
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/admin/products/{capo_id}"))
                .header(header::COOKIE, &admin_cookie)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("delete product");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get(&format!("/api/products/{capo_id}")))
        .await
        .expect("deleted product");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Log in an already-registered account and return its session cookie.
async fn login_existing(app: &Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            &json!({ "username": username, "password": password }),
        ))
        .await
        .expect("login");
    assert_eq!(response.status(), StatusCode::OK);

    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie")
        .to_str()
        .expect("cookie str")
        .split(';')
        .next()
        .expect("cookie value")
        .to_string()
}
