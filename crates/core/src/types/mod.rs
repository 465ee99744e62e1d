//! Shared type definitions.

pub mod id;
pub mod money;
pub mod status;

pub use id::{OrderId, OrderLineId, ProductId, UserId};
pub use money::{Money, MoneyError};
pub use status::{OrderStatus, PaymentMethod};
