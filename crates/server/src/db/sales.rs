//! Sales aggregate repository.
//!
//! `sales_tracking` keeps one row per product with cumulative units sold and
//! revenue. It is derived state: at any point it must equal the sum over the
//! historical order lines for that product. It is maintained incrementally
//! inside the checkout transaction for read performance.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, SqliteConnection, SqlitePool};

use crescendo_core::{Money, ProductId};

use super::RepositoryError;

/// One product's sales aggregate joined with catalog fields.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SalesRow {
    pub product_id: ProductId,
    pub name: String,
    pub category: String,
    pub quantity_sold: i64,
    pub total_revenue: Money,
    pub last_updated: DateTime<Utc>,
}

/// One product's inventory position with sales totals.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InventoryRow {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub stock: i64,
    pub price: Money,
    pub sold: i64,
    pub revenue: Money,
}

/// Repository for the per-product sales aggregate.
pub struct SalesRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SalesRepository<'a> {
    /// Create a new sales repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Accumulate a sales delta for one product: create the row on first
    /// sale, otherwise add to the running totals.
    ///
    /// Runs on the checkout transaction's connection. The transaction holds
    /// the database write lock from its first statement onward, so this
    /// read-modify-write cannot lose updates to a concurrent checkout. The
    /// revenue addition happens in `Decimal`, keeping the TEXT-stored total
    /// exact.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a statement fails.
    pub async fn accumulate(
        conn: &mut SqliteConnection,
        product_id: ProductId,
        delta_quantity: i64,
        delta_revenue: Money,
        now: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let existing = sqlx::query_as::<_, (i64, Money)>(
            "SELECT quantity_sold, total_revenue FROM sales_tracking WHERE product_id = ?",
        )
        .bind(product_id)
        .fetch_optional(&mut *conn)
        .await?;

        match existing {
            Some((quantity_sold, total_revenue)) => {
                sqlx::query(
                    "UPDATE sales_tracking \
                     SET quantity_sold = ?, total_revenue = ?, last_updated = ? \
                     WHERE product_id = ?",
                )
                .bind(quantity_sold + delta_quantity)
                .bind(total_revenue + delta_revenue)
                .bind(now)
                .bind(product_id)
                .execute(&mut *conn)
                .await?;
            }
            None => {
                sqlx::query(
                    "INSERT INTO sales_tracking \
                         (product_id, quantity_sold, total_revenue, last_updated) \
                     VALUES (?, ?, ?, ?)",
                )
                .bind(product_id)
                .bind(delta_quantity)
                .bind(delta_revenue)
                .bind(now)
                .execute(&mut *conn)
                .await?;
            }
        }

        Ok(())
    }

    /// Per-product sales totals joined with the catalog, best sellers first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn sales_by_product(&self) -> Result<Vec<SalesRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, SalesRow>(
            "SELECT st.product_id, p.name, p.category, \
                    st.quantity_sold, st.total_revenue, st.last_updated \
             FROM sales_tracking st \
             JOIN products p ON st.product_id = p.id \
             ORDER BY st.quantity_sold DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Full catalog with stock and sales totals (zero where never sold).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn inventory_report(&self) -> Result<Vec<InventoryRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, InventoryRow>(
            "SELECT p.id, p.name, p.category, p.stock, p.price, \
                    COALESCE(st.quantity_sold, 0) AS sold, \
                    COALESCE(st.total_revenue, '0') AS revenue \
             FROM products p \
             LEFT JOIN sales_tracking st ON p.id = st.product_id \
             ORDER BY p.name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Read one product's aggregate, if it exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        product_id: ProductId,
    ) -> Result<Option<(i64, Money)>, RepositoryError> {
        let row = sqlx::query_as::<_, (i64, Money)>(
            "SELECT quantity_sold, total_revenue FROM sales_tracking WHERE product_id = ?",
        )
        .bind(product_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }
}
