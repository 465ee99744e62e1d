//! Request middleware: sessions and caller identity.

pub mod auth;
pub mod session;

pub use auth::{CurrentUser, RequireAdmin, RequireAuth};
pub use session::{create_session_layer, create_session_store, session_keys};
