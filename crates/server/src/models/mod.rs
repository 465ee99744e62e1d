//! Domain models for the storefront.

pub mod order;
pub mod product;
pub mod user;

pub use order::{Order, OrderLine, OrderLineDetail};
pub use product::{NewProduct, Product, ProductFilter};
pub use user::User;
