//! User account model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crescendo_core::UserId;

/// A storefront user account.
///
/// The password hash is never part of this struct; it is fetched
/// separately by the auth service when verifying credentials.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}
