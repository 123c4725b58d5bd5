//! Product variant availability models.

use serde::{Deserialize, Serialize};

/// `data` of the product variants GraphQL query.
#[derive(Debug, Default, Deserialize)]
pub struct ProductVariantsData {
    pub product: Option<ProductVariantsNode>,
}

#[derive(Debug, Deserialize)]
pub struct ProductVariantsNode {
    pub variants: VariantConnection,
}

#[derive(Debug, Deserialize)]
pub struct VariantConnection {
    #[serde(default)]
    pub nodes: Vec<AdminVariant>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminVariant {
    pub id: String,
    pub title: Option<String>,
    #[serde(default)]
    pub available_for_sale: bool,
}

impl ProductVariantsData {
    /// Variants of the product, empty when the product is unknown.
    pub fn into_variants(self) -> Vec<AdminVariant> {
        self.product
            .map(|product| product.variants.nodes)
            .unwrap_or_default()
    }
}

/// Response of `GET /proxy/stock`.
///
/// ```json
/// { "variants": [{ "id": "gid://shopify/ProductVariant/1", "title": "Small", "available": true }] }
/// ```
#[derive(Debug, Serialize)]
pub struct StockResponse {
    pub variants: Vec<VariantView>,
}

#[derive(Debug, Serialize)]
pub struct VariantView {
    pub id: String,
    pub title: Option<String>,
    pub available: bool,
}

impl From<AdminVariant> for VariantView {
    fn from(variant: AdminVariant) -> Self {
        Self {
            id: variant.id,
            title: variant.title,
            available: variant.available_for_sale,
        }
    }
}
