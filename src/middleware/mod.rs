//! HTTP middleware components.
//!
//! Middleware are functions that run before route handlers.
//! They can:
//! - Authenticate requests
//! - Short-circuit requests (reject forged or malformed ones)
//! - Attach request context for the handlers

/// Proxy signature authentication middleware
pub mod auth;
