//! Proxy request authentication middleware.
//!
//! This middleware intercepts every proxied request to:
//! 1. Capture the request path, query and headers
//! 2. Resolve and normalize the shop domain
//! 3. Verify the platform signature against the shared secret
//! 4. Inject the `ShopIdentity` into the request, or reject it
//!
//! Verification is synchronous and stateless. The only shared state is the
//! read-only secret held by [`ProxyAuth`].

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    config::SharedSecret,
    error::AuthError,
    models::{proxy_request::ProxyRequest, shop::ShopIdentity},
    services::{proxy_signature, shop_domain},
};

/// Result of authenticating one proxied request.
pub type VerificationOutcome = Result<ShopIdentity, AuthError>;

/// The authentication gate in front of every proxied route.
#[derive(Debug, Clone)]
pub struct ProxyAuth {
    secret: Option<SharedSecret>,
}

impl ProxyAuth {
    /// Build the gate around the app's shared secret. An empty secret counts
    /// as unconfigured.
    pub fn new(secret: Option<SharedSecret>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    /// Authenticate a proxied request.
    ///
    /// # Flow
    ///
    /// 1. Secret configured, else `MissingSecret`
    /// 2. Shop resolved, else `MissingShop`
    /// 3. Signature verified, else `MissingSignature` / `BadSignature`
    ///
    /// The first failing step decides the outcome; nothing is retried.
    pub fn authenticate(&self, request: &ProxyRequest) -> VerificationOutcome {
        let secret = self.secret.as_ref().ok_or(AuthError::MissingSecret)?;
        let shop = shop_domain::resolve_shop(request)?;
        let convention = proxy_signature::verify(request, secret)?;

        tracing::debug!("Authenticated {} request for {}", convention, shop);
        Ok(shop)
    }
}

/// Proxy authentication middleware function.
///
/// # Arguments
///
/// * `State(auth)` - The gate, shared by all requests
/// * `request` - Incoming HTTP request (mutable to add extensions)
/// * `next` - Next middleware/handler in the chain
///
/// # Returns
///
/// - `Ok(Response)` from the next handler, with `ShopIdentity` in the request extensions
/// - `Err(AuthError)` rendered as a JSON rejection; the handler never runs
pub async fn proxy_auth_middleware(
    State(auth): State<Arc<ProxyAuth>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    // A missing secret is a deployment fault and must not be masked by a
    // malformed request.
    let outcome = if auth.is_configured() {
        ProxyRequest::from_parts(request.uri(), request.headers())
            .and_then(|descriptor| auth.authenticate(&descriptor))
    } else {
        Err(AuthError::MissingSecret)
    };

    match outcome {
        Ok(shop) => {
            // Route handlers extract this with Extension<ShopIdentity>
            request.extensions_mut().insert(shop);
            Ok(next.run(request).await)
        }
        Err(e) => {
            if matches!(e, AuthError::MissingSecret) {
                tracing::error!("Rejected {}: {}", request.uri().path(), e);
            } else {
                tracing::warn!("Rejected {}: {}", request.uri().path(), e);
            }
            Err(e)
        }
    }
}
