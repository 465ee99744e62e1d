//! Order placement.
//!
//! `CheckoutService` validates a submitted cart and executes the whole
//! placement as one database transaction: order header, order lines, stock
//! decrements, and the per-product sales aggregate either all land or none
//! do. Concurrent checkouts serialize on the database write lock, which the
//! transaction acquires with its very first statement (the header insert),
//! so the later read-modify-write on the aggregate can never lose an update.
//!
//! Submitted unit prices are trusted as-is and frozen into the order lines;
//! they are not re-read from the catalog (see DESIGN.md).

use std::collections::BTreeMap;

use chrono::Utc;
use serde::Deserialize;
use sqlx::SqlitePool;
use thiserror::Error;

use crescendo_core::{Money, OrderId, OrderStatus, PaymentMethod, ProductId};

use crate::config::StockPolicy;
use crate::db::RepositoryError;
use crate::db::orders::OrderRepository;
use crate::db::products::ProductRepository;
use crate::db::sales::SalesRepository;
use crate::middleware::CurrentUser;

/// One cart line as submitted by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct CartItem {
    /// Product being purchased.
    pub id: ProductId,
    /// Units purchased; must be positive.
    pub quantity: i64,
    /// Unit price the client observed.
    pub price: Money,
}

/// The outcome of a successful order placement.
#[derive(Debug, Clone, Copy)]
pub struct PlacedOrder {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub total_amount: Money,
}

/// Errors that can occur during order placement.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart contains no items.
    #[error("no items in order")]
    EmptyCart,

    /// A cart line has a zero or negative quantity.
    #[error("invalid quantity for product {0}")]
    NonPositiveQuantity(ProductId),

    /// A cart line has a negative unit price.
    #[error("invalid price for product {0}")]
    NegativePrice(ProductId),

    /// Strict stock policy: not enough units remain for a product.
    #[error("insufficient stock for product {0}")]
    InsufficientStock(ProductId),

    /// Storage failure; the whole transaction was rolled back.
    #[error("storage error: {0}")]
    Repository(#[from] RepositoryError),
}

/// The order transaction engine.
pub struct CheckoutService<'a> {
    pool: &'a SqlitePool,
    policy: StockPolicy,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool, policy: StockPolicy) -> Self {
        Self { pool, policy }
    }

    /// Place an order for the caller.
    ///
    /// Validates the cart, computes the exact decimal total, and performs
    /// the multi-table write as a single atomic unit of work:
    ///
    /// 1. insert the order header (status `pending`, server timestamp);
    /// 2. insert one line per cart entry with the captured unit price;
    /// 3. decrement each product's stock (guarded under the strict policy);
    /// 4. accumulate the per-product sales aggregate, combining multiple
    ///    lines for the same product into a single delta.
    ///
    /// On any failure every effect is rolled back; no partial order, line,
    /// stock change, or aggregate change is observable.
    ///
    /// # Errors
    ///
    /// Returns a validation variant before any write begins, or
    /// `CheckoutError::InsufficientStock` / `CheckoutError::Repository`
    /// after a full rollback.
    pub async fn place_order(
        &self,
        caller: &CurrentUser,
        cart: &[CartItem],
        payment_method: PaymentMethod,
        delivery_address: &str,
    ) -> Result<PlacedOrder, CheckoutError> {
        validate_cart(cart)?;

        let total_amount = cart_total(cart);
        let now = Utc::now();

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let order_id = OrderRepository::insert_order(
            &mut tx,
            caller.id,
            total_amount,
            payment_method,
            delivery_address,
            now,
        )
        .await?;

        for line in cart {
            OrderRepository::insert_line(&mut tx, order_id, line.id, line.quantity, line.price)
                .await?;
        }

        for line in cart {
            match self.policy {
                StockPolicy::Permissive => {
                    ProductRepository::decrement_stock(&mut tx, line.id, line.quantity).await?;
                }
                StockPolicy::Strict => {
                    let decremented =
                        ProductRepository::decrement_stock_guarded(&mut tx, line.id, line.quantity)
                            .await?;
                    if !decremented {
                        // Dropping the transaction rolls everything back
                        return Err(CheckoutError::InsufficientStock(line.id));
                    }
                }
            }
        }

        for (product_id, (delta_quantity, delta_revenue)) in combine_deltas(cart) {
            SalesRepository::accumulate(&mut tx, product_id, delta_quantity, delta_revenue, now)
                .await?;
        }

        tx.commit().await.map_err(RepositoryError::from)?;

        tracing::info!(
            order_id = %order_id,
            user_id = %caller.id,
            total = %total_amount,
            lines = cart.len(),
            "order placed"
        );

        Ok(PlacedOrder {
            order_id,
            status: OrderStatus::Pending,
            total_amount,
        })
    }
}

/// Reject carts that must never reach the database.
fn validate_cart(cart: &[CartItem]) -> Result<(), CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    for line in cart {
        if line.quantity <= 0 {
            return Err(CheckoutError::NonPositiveQuantity(line.id));
        }
        if line.price.is_negative() {
            return Err(CheckoutError::NegativePrice(line.id));
        }
    }
    Ok(())
}

/// Exact decimal order total.
fn cart_total(cart: &[CartItem]) -> Money {
    cart.iter().map(|line| line.price.times(line.quantity)).sum()
}

/// Combine cart lines into one aggregate delta per product.
///
/// Two lines for the same product must sum into a single delta, not fight
/// as two overwrites of the same aggregate row.
fn combine_deltas(cart: &[CartItem]) -> BTreeMap<ProductId, (i64, Money)> {
    let mut deltas: BTreeMap<ProductId, (i64, Money)> = BTreeMap::new();
    for line in cart {
        let entry = deltas.entry(line.id).or_insert((0, Money::ZERO));
        entry.0 += line.quantity;
        entry.1 += line.price.times(line.quantity);
    }
    deltas
}
