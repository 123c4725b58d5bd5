//! Order lookup handler.
//!
//! - GET /proxy/order?number=1001&email=a@b.com

use axum::{
    Extension, Json,
    extract::{RawQuery, State},
    http::header,
    response::IntoResponse,
};
use futures::future::join_all;

use crate::{
    error::AppError,
    models::{
        order::{OrderLookupParams, OrderLookupResponse},
        proxy_request::QueryParams,
        shop::ShopIdentity,
    },
    state::AppState,
};

/// Look up an order by number and customer email.
///
/// # Response
///
/// - **Success (200 OK)**: the order's line items with product handles
/// - **Error (400)**: `missing_params` when `number` or `email` is absent
/// - **Error (404)**: `not_found` when no order matches
/// - **Error (500)**: `server_error` when the admin API call fails
///
/// Product handles are fetched concurrently, one call per line item. A failed
/// handle lookup leaves that item's handle empty instead of failing the order.
pub async fn lookup_order(
    State(state): State<AppState>,
    Extension(shop): Extension<ShopIdentity>,
    RawQuery(raw): RawQuery,
) -> Result<impl IntoResponse, AppError> {
    let query = QueryParams::parse(raw.as_deref().unwrap_or_default());
    let params = OrderLookupParams::from_query(&query).ok_or(AppError::MissingParams)?;

    let order = state
        .admin
        .find_order(&shop, &params.number, &params.email)
        .await?
        .ok_or(AppError::NotFound)?;

    let handles = join_all(order.line_items.iter().map(|item| {
        let admin = &state.admin;
        let shop = &shop;
        async move {
            let Some(product_id) = item.product_id else {
                return String::new();
            };
            admin
                .product_handle(shop, product_id)
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!("Handle lookup for product {} failed: {}", product_id, e);
                    String::new()
                })
        }
    }))
    .await;

    Ok((
        [(header::CACHE_CONTROL, "no-store")],
        Json(OrderLookupResponse::new(&order, handles)),
    ))
}
