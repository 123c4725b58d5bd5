//! Normalized shop domain bound to authenticated requests.

use std::fmt;

/// Domain of the shop a proxied request belongs to, e.g. `demo.myshopify.com`.
///
/// Only built by [`crate::services::shop_domain::normalize_shop`], so the value
/// is always lower-cased and carries no scheme or path. Route handlers extract
/// it with `Extension<ShopIdentity>` once the gate has let the request through.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShopIdentity(pub(crate) String);

impl ShopIdentity {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShopIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
