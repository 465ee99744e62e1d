//! Business services.
//!
//! - [`auth`] - Registration and login
//! - [`checkout`] - The order transaction engine

pub mod auth;
pub mod checkout;
