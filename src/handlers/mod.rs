//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives the authenticated `ShopIdentity` and the request data
//! 2. Calls the shop's admin API
//! 3. Reshapes the answer into the JSON the storefront expects

/// Liveness endpoint
pub mod health;
/// Order lookup endpoint
pub mod orders;
/// Variant availability endpoint
pub mod stock;
/// Staged upload endpoints
pub mod uploads;
