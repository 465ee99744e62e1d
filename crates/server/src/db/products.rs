//! Catalog repository.
//!
//! Read by checkout to validate availability and mutated by checkout to
//! decrement stock; admin CRUD is plain lookups and updates.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use crescendo_core::ProductId;

use super::RepositoryError;
use crate::models::{NewProduct, Product, ProductFilter};

const PRODUCT_COLUMNS: &str = "id, name, category, brand, price, description, \
     specifications, image_url, rating, stock, created_at";

/// Repository for catalog operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// List products matching a filter.
    ///
    /// All supplied predicates are ANDed. The substring search uses SQLite
    /// `LIKE`, which is case-insensitive for ASCII, over name OR brand.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let mut query: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE 1=1"));

        if let Some(category) = filter.category_predicate() {
            query.push(" AND category = ");
            query.push_bind(category.to_owned());
        }
        if let Some(min_price) = filter.min_price {
            query.push(" AND CAST(price AS REAL) >= CAST(");
            query.push_bind(min_price);
            query.push(" AS REAL)");
        }
        if let Some(max_price) = filter.max_price {
            query.push(" AND CAST(price AS REAL) <= CAST(");
            query.push_bind(max_price);
            query.push(" AS REAL)");
        }
        if let Some(search) = filter.search_predicate() {
            let pattern = format!("%{search}%");
            query.push(" AND (name LIKE ");
            query.push_bind(pattern.clone());
            query.push(" OR brand LIKE ");
            query.push_bind(pattern);
            query.push(")");
        }
        query.push(" ORDER BY id");

        let products = query
            .build_query_as::<Product>()
            .fetch_all(self.pool)
            .await?;

        Ok(products)
    }

    /// Create a new product, returning it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO products \
                 (name, category, brand, price, description, specifications, \
                  image_url, rating, stock, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&product.name)
        .bind(&product.category)
        .bind(&product.brand)
        .bind(product.price)
        .bind(&product.description)
        .bind(&product.specifications)
        .bind(&product.image_url)
        .bind(product.rating)
        .bind(product.stock)
        .bind(created_at)
        .execute(self.pool)
        .await?;

        let id = ProductId::new(result.last_insert_rowid());
        self.get(id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Replace all editable fields of a product.
    ///
    /// Returns `false` if the product does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        id: ProductId,
        product: &NewProduct,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE products SET \
                 name = ?, category = ?, brand = ?, price = ?, description = ?, \
                 specifications = ?, image_url = ?, rating = ?, stock = ? \
             WHERE id = ?",
        )
        .bind(&product.name)
        .bind(&product.category)
        .bind(&product.brand)
        .bind(product.price)
        .bind(&product.description)
        .bind(&product.specifications)
        .bind(&product.image_url)
        .bind(product.rating)
        .bind(product.stock)
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a product.
    ///
    /// Returns `false` if the product does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Decrement stock without a sufficiency guard (permissive policy).
    ///
    /// Stock may go negative under concurrent overselling; this matches the
    /// permissive policy. Runs on the checkout transaction's connection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn decrement_stock(
        conn: &mut SqliteConnection,
        id: ProductId,
        quantity: i64,
    ) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE products SET stock = stock - ? WHERE id = ?")
            .bind(quantity)
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    /// Decrement stock only if sufficient units remain (strict policy).
    ///
    /// Returns `false` when the guard is unmet; the caller is expected to
    /// roll back the surrounding transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown product, so an
    /// absent row is never mistaken for insufficient stock. Returns
    /// `RepositoryError::Database` if a statement fails.
    pub async fn decrement_stock_guarded(
        conn: &mut SqliteConnection,
        id: ProductId,
        quantity: i64,
    ) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("UPDATE products SET stock = stock - ?1 WHERE id = ?2 AND stock >= ?1")
                .bind(quantity)
                .bind(id)
                .execute(&mut *conn)
                .await?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE id = ?)")
            .bind(id)
            .fetch_one(&mut *conn)
            .await?;
        if !exists {
            return Err(RepositoryError::NotFound);
        }

        Ok(false)
    }
}
