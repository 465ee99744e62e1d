//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crescendo_core::{Money, ProductId};
use crescendo_server::db::products::ProductRepository;
use crescendo_server::db::users::UserRepository;
use crescendo_server::db::{self, RepositoryError};
use crescendo_server::middleware::CurrentUser;
use crescendo_server::models::NewProduct;

/// In-memory database with the full schema applied.
///
/// A single connection keeps the in-memory database alive for the whole
/// test and makes every query observe the same state.
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("options")
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("connect in-memory database");

    db::run_migrations(&pool).await.expect("run migrations");
    pool
}

/// File-backed database for tests that need real connection concurrency.
///
/// The caller must keep the returned `TempDir` alive for the duration of
/// the test.
pub async fn file_pool() -> (tempfile::TempDir, SqlitePool) {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = format!("sqlite://{}", dir.path().join("test.db").display());

    let pool = db::create_pool(&url).await.expect("create pool");
    db::run_migrations(&pool).await.expect("run migrations");

    (dir, pool)
}

/// Insert a minimal catalog product and return its id.
pub async fn insert_product(pool: &SqlitePool, name: &str, price: &str, stock: i64) -> ProductId {
    let product = NewProduct {
        name: name.to_string(),
        category: "Guitars".to_string(),
        brand: "TestBrand".to_string(),
        price: price.parse::<Money>().expect("price"),
        description: String::new(),
        specifications: String::new(),
        image_url: String::new(),
        rating: 5.0,
        stock,
    };

    ProductRepository::new(pool)
        .create(&product)
        .await
        .expect("insert product")
        .id
}

/// Insert a user row directly and return the caller identity.
///
/// The password hash is a placeholder; these users never log in through
/// the HTTP surface.
pub async fn insert_user(pool: &SqlitePool, username: &str, is_admin: bool) -> CurrentUser {
    let user = UserRepository::new(pool)
        .create(
            username,
            &format!("{username}@example.com"),
            "unusable-hash",
            is_admin,
        )
        .await
        .expect("insert user");

    CurrentUser::from(&user)
}

/// Current stock level for a product.
pub async fn stock_of(pool: &SqlitePool, id: ProductId) -> i64 {
    sqlx::query_scalar("SELECT stock FROM products WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("read stock")
}

/// True when the error is a database-level failure (e.g. FK violation).
pub fn is_database_error(error: &RepositoryError) -> bool {
    matches!(error, RepositoryError::Database(_))
}
