//! Order and order-line models.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crescendo_core::{Money, OrderId, OrderLineId, OrderStatus, PaymentMethod, ProductId, UserId};

/// An order header.
///
/// `total_amount` is the frozen sum of line subtotals at placement time;
/// it is never recomputed from the catalog.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub total_amount: Money,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub delivery_address: String,
    pub created_at: DateTime<Utc>,
}

/// A single order line.
///
/// `price` is the unit price captured at purchase time; later catalog
/// price changes never touch it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderLine {
    pub id: OrderLineId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub price: Money,
}

/// An order line joined with display fields from the product.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderLineDetail {
    pub id: OrderLineId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub price: Money,
    pub name: String,
    pub brand: String,
    pub image_url: String,
}
