//! Order lookup models.
//!
//! This module defines:
//! - `AdminOrder` / `AdminLineItem`: the slice of the admin REST order we read
//! - `OrderLookupResponse`: what the storefront receives

use serde::{Deserialize, Serialize};

use crate::models::proxy_request::QueryParams;

/// Envelope of `GET /orders.json`.
#[derive(Debug, Deserialize)]
pub struct OrdersEnvelope {
    #[serde(default)]
    pub orders: Vec<AdminOrder>,
}

/// Order as returned by the admin REST API with
/// `fields=id,currency,line_items`.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminOrder {
    pub id: u64,
    pub currency: Option<String>,
    #[serde(default)]
    pub line_items: Vec<AdminLineItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminLineItem {
    pub name: Option<String>,
    pub product_id: Option<u64>,
    pub variant_id: Option<u64>,
    pub quantity: Option<i64>,
    pub sku: Option<String>,
}

/// Envelope of `GET /products/<id>.json`.
#[derive(Debug, Deserialize)]
pub struct ProductEnvelope {
    pub product: Option<ProductHandle>,
}

#[derive(Debug, Deserialize)]
pub struct ProductHandle {
    #[serde(default)]
    pub handle: String,
}

/// Query parameters of `GET /proxy/order`.
#[derive(Debug)]
pub struct OrderLookupParams {
    /// Order number without the leading `#`
    pub number: String,
    pub email: String,
}

impl OrderLookupParams {
    /// Both `number` and `email` must be present and non-empty.
    pub fn from_query(query: &QueryParams) -> Option<Self> {
        Some(Self {
            number: query.first("number")?.to_string(),
            email: query.first("email")?.to_string(),
        })
    }
}

/// Response of `GET /proxy/order`.
///
/// # JSON Example
///
/// ```json
/// {
///   "orderId": 450789469,
///   "currency": "USD",
///   "items": [{
///     "title": "IPod Nano - 8gb",
///     "productId": "gid://shopify/Product/632910392",
///     "variantId": "gid://shopify/ProductVariant/808950810",
///     "handle": "ipod-nano",
///     "quantity": 1,
///     "sku": "IPOD2008PINK",
///     "available": true
///   }]
/// }
/// ```
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLookupResponse {
    pub order_id: u64,
    pub currency: Option<String>,
    pub items: Vec<LineItemView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemView {
    pub title: Option<String>,
    pub product_id: Option<String>,
    pub variant_id: Option<String>,
    pub handle: String,
    pub quantity: Option<i64>,
    pub sku: String,
    pub available: bool,
}

/// Global id of a product.
pub fn product_gid(id: u64) -> String {
    format!("gid://shopify/Product/{id}")
}

/// Global id of a product variant.
pub fn variant_gid(id: u64) -> String {
    format!("gid://shopify/ProductVariant/{id}")
}

impl LineItemView {
    /// Reshape a line item. Items are always reported as available.
    pub fn from_line_item(item: &AdminLineItem, handle: String) -> Self {
        Self {
            title: item.name.clone(),
            product_id: item.product_id.map(product_gid),
            variant_id: item.variant_id.map(variant_gid),
            handle,
            quantity: item.quantity,
            sku: item.sku.clone().unwrap_or_default(),
            available: true,
        }
    }
}

impl OrderLookupResponse {
    /// Pair each line item with its product handle (same order as `line_items`).
    pub fn new(order: &AdminOrder, handles: Vec<String>) -> Self {
        let items = order
            .line_items
            .iter()
            .zip(handles)
            .map(|(item, handle)| LineItemView::from_line_item(item, handle))
            .collect();

        Self {
            order_id: order.id,
            currency: order.currency.clone(),
            items,
        }
    }
}
