//! Shop domain resolution and normalization.
//!
//! The platform identifies the shop in several places depending on how the
//! request reached us. The first non-empty source wins:
//!
//! 1. `shop` query parameter
//! 2. `X-Shopify-Shop-Domain` header
//! 3. `X-Shopify-Shop` header
//! 4. `X-Forwarded-Host` header
//!
//! The domain shape is not what makes a request trusted. Trust comes from the
//! signature; this module only canonicalizes the value.

use crate::error::AuthError;
use crate::models::proxy_request::ProxyRequest;
use crate::models::shop::ShopIdentity;

/// Query parameter carrying the shop domain.
pub const SHOP_PARAM: &str = "shop";

/// Headers carrying the shop domain, highest priority first.
pub const SHOP_HEADERS: [&str; 3] = ["x-shopify-shop-domain", "x-shopify-shop", "x-forwarded-host"];

/// Suffix appended to bare store names.
pub const PRIMARY_SUFFIX: &str = ".myshopify.com";

/// Domain suffixes that already identify a platform shop.
pub const RECOGNIZED_SUFFIXES: [&str; 3] = [PRIMARY_SUFFIX, ".shopifypreview.com", ".myshopify.io"];

/// Pick the raw shop value from the highest-priority non-empty source.
pub fn shop_candidate(request: &ProxyRequest) -> Option<&str> {
    request.query().first(SHOP_PARAM).or_else(|| {
        SHOP_HEADERS
            .iter()
            .filter_map(|name| request.header(name))
            .find(|value| !value.trim().is_empty())
    })
}

/// Resolve the shop of a proxied request.
///
/// # Errors
///
/// [`AuthError::MissingShop`] when no source carries a value, or when the
/// winning value normalizes to nothing (e.g. `"https://"`).
pub fn resolve_shop(request: &ProxyRequest) -> Result<ShopIdentity, AuthError> {
    shop_candidate(request)
        .and_then(normalize_shop)
        .ok_or(AuthError::MissingShop)
}

/// Canonicalize a shop domain.
///
/// Trims, lower-cases, drops a leading `http://` or `https://` and anything
/// from the first `/`, `?` or `#` on. A bare store name (no dot) gets
/// [`PRIMARY_SUFFIX`] appended; any other dotted domain is kept as-is.
///
/// Returns `None` if nothing is left after stripping.
pub fn normalize_shop(candidate: &str) -> Option<ShopIdentity> {
    let lowered = candidate.trim().to_lowercase();

    let without_scheme = lowered
        .strip_prefix("https://")
        .or_else(|| lowered.strip_prefix("http://"))
        .unwrap_or(&lowered);

    let domain = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .trim();

    if domain.is_empty() {
        return None;
    }

    let recognized = RECOGNIZED_SUFFIXES
        .iter()
        .any(|suffix| domain.ends_with(suffix));

    if !recognized && !domain.contains('.') {
        return Some(ShopIdentity(format!("{domain}{PRIMARY_SUFFIX}")));
    }

    Some(ShopIdentity(domain.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::proxy_request::QueryParams;

    fn request(query: &str, headers: &[(&str, &str)]) -> ProxyRequest {
        ProxyRequest::new(
            "/proxy/order",
            QueryParams::parse(query),
            headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
    }

    fn normalized(candidate: &str) -> String {
        normalize_shop(candidate).unwrap().to_string()
    }

    #[test]
    fn bare_store_name_gets_primary_suffix() {
        assert_eq!(normalized("my-store"), "my-store.myshopify.com");
    }

    #[test]
    fn scheme_case_and_path_are_stripped() {
        assert_eq!(
            normalized("HTTPS://My-Store.myshopify.com/path"),
            "my-store.myshopify.com"
        );
        assert_eq!(
            normalized("  http://demo.myshopify.com?x=1 "),
            "demo.myshopify.com"
        );
        assert_eq!(normalized("demo.myshopify.com#top"), "demo.myshopify.com");
    }

    #[test]
    fn bare_name_with_scheme_still_gets_suffix() {
        assert_eq!(normalized("https://My-Store/apps/proxy"), "my-store.myshopify.com");
    }

    #[test]
    fn other_recognized_suffixes_are_kept() {
        assert_eq!(normalized("demo.shopifypreview.com"), "demo.shopifypreview.com");
        assert_eq!(normalized("Demo.MyShopify.io"), "demo.myshopify.io");
    }

    #[test]
    fn dotted_foreign_domain_passes_through() {
        assert_eq!(normalized("shop.example.com"), "shop.example.com");
    }

    #[test]
    fn nothing_left_after_stripping_is_none() {
        assert_eq!(normalize_shop("https://"), None);
        assert_eq!(normalize_shop("   "), None);
        assert_eq!(normalize_shop("/only/a/path"), None);
    }

    #[test]
    fn query_parameter_beats_headers() {
        let req = request(
            "shop=from-query",
            &[("X-Shopify-Shop-Domain", "from-header.myshopify.com")],
        );
        assert_eq!(resolve_shop(&req).unwrap().as_str(), "from-query.myshopify.com");
    }

    #[test]
    fn headers_are_tried_in_priority_order() {
        let req = request(
            "",
            &[
                ("X-Forwarded-Host", "forwarded.myshopify.com"),
                ("X-Shopify-Shop", "generic.myshopify.com"),
                ("X-Shopify-Shop-Domain", "domain.myshopify.com"),
            ],
        );
        assert_eq!(resolve_shop(&req).unwrap().as_str(), "domain.myshopify.com");

        let req = request(
            "",
            &[
                ("X-Forwarded-Host", "forwarded.myshopify.com"),
                ("X-Shopify-Shop", "generic.myshopify.com"),
            ],
        );
        assert_eq!(resolve_shop(&req).unwrap().as_str(), "generic.myshopify.com");

        let req = request("", &[("X-Forwarded-Host", "forwarded.myshopify.com")]);
        assert_eq!(resolve_shop(&req).unwrap().as_str(), "forwarded.myshopify.com");
    }

    #[test]
    fn empty_sources_fall_through() {
        let req = request(
            "shop=%20%20",
            &[("X-Shopify-Shop-Domain", ""), ("X-Shopify-Shop", "generic")],
        );
        assert_eq!(resolve_shop(&req).unwrap().as_str(), "generic.myshopify.com");
    }

    #[test]
    fn repeated_shop_param_uses_first_non_empty_value() {
        let req = request("shop=&shop=demo", &[("X-Shopify-Shop", "generic")]);
        assert_eq!(resolve_shop(&req).unwrap().as_str(), "demo.myshopify.com");
    }

    #[test]
    fn no_source_is_missing_shop() {
        let req = request("a=1&b=2", &[("Accept", "application/json")]);
        assert!(matches!(resolve_shop(&req), Err(AuthError::MissingShop)));
    }
}
