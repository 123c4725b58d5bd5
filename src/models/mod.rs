//! Data models for proxied requests and the admin API payloads they reshape.

/// Inbound request descriptor and query parameters
pub mod proxy_request;
/// Normalized shop identity
pub mod shop;
/// Order lookup payloads
pub mod order;
/// Product variant stock payloads
pub mod stock;
/// Staged upload payloads
pub mod upload;
