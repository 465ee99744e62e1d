//! Order repository.
//!
//! Transactional writes (header + lines) run on the checkout transaction's
//! connection; reads are ownership-scoped to the requesting user.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};

use crescendo_core::{Money, OrderId, OrderStatus, PaymentMethod, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Order, OrderLineDetail};

const ORDER_COLUMNS: &str =
    "id, user_id, total_amount, status, payment_method, delivery_address, created_at";

/// Repository for order reads and transactional order writes.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert an order header, returning the assigned id.
    ///
    /// Runs on the checkout transaction's connection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert_order(
        conn: &mut SqliteConnection,
        user_id: UserId,
        total_amount: Money,
        payment_method: PaymentMethod,
        delivery_address: &str,
        created_at: DateTime<Utc>,
    ) -> Result<OrderId, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO orders \
                 (user_id, total_amount, status, payment_method, delivery_address, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(total_amount)
        .bind(OrderStatus::Pending)
        .bind(payment_method)
        .bind(delivery_address)
        .bind(created_at)
        .execute(&mut *conn)
        .await?;

        Ok(OrderId::new(result.last_insert_rowid()))
    }

    /// Insert one order line with its captured unit price.
    ///
    /// Runs on the checkout transaction's connection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails (including
    /// foreign-key violations for unknown products).
    pub async fn insert_line(
        conn: &mut SqliteConnection,
        order_id: OrderId,
        product_id: ProductId,
        quantity: i64,
        price: Money,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO order_items (order_id, product_id, quantity, price) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(order_id)
        .bind(product_id)
        .bind(quantity)
        .bind(price)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Get an order only if it belongs to the given user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_user(
        &self,
        order_id: OrderId,
        user_id: UserId,
    ) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ? AND user_id = ?"
        ))
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(order)
    }

    /// List a user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE user_id = ? ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// Fetch an order's lines joined with product display fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines_with_products(
        &self,
        order_id: OrderId,
    ) -> Result<Vec<OrderLineDetail>, RepositoryError> {
        let lines = sqlx::query_as::<_, OrderLineDetail>(
            "SELECT oi.id, oi.order_id, oi.product_id, oi.quantity, oi.price, \
                    p.name, p.brand, p.image_url \
             FROM order_items oi \
             JOIN products p ON oi.product_id = p.id \
             WHERE oi.order_id = ? \
             ORDER BY oi.id",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(lines)
    }
}
