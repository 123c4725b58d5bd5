//! Business logic services.
//!
//! Services contain the logic separated from HTTP handlers: request
//! authentication and the calls to the admin API.

pub mod admin_api;
pub mod proxy_signature;
pub mod shop_domain;
