//! Variant availability handler.
//!
//! - GET /proxy/stock?productId=gid://shopify/Product/123

use axum::{
    Extension, Json,
    extract::{RawQuery, State},
    http::header,
    response::IntoResponse,
};

use crate::{
    error::AppError,
    models::{proxy_request::QueryParams, shop::ShopIdentity, stock::StockResponse},
    state::AppState,
};

/// List a product's variants and whether each is available for sale.
///
/// # Response
///
/// - **Success (200 OK)**: `{ "variants": [...] }`, empty for an unknown product
/// - **Error (400)**: `missing_productId`
/// - **Error (500)**: `server_error` when the admin API call fails
pub async fn product_stock(
    State(state): State<AppState>,
    Extension(shop): Extension<ShopIdentity>,
    RawQuery(raw): RawQuery,
) -> Result<impl IntoResponse, AppError> {
    let query = QueryParams::parse(raw.as_deref().unwrap_or_default());
    let product_id = query.first("productId").ok_or(AppError::MissingProductId)?;

    let variants = state.admin.product_variants(&shop, product_id).await?;

    Ok((
        [(header::CACHE_CONTROL, "no-store")],
        Json(StockResponse {
            variants: variants.into_iter().map(Into::into).collect(),
        }),
    ))
}
