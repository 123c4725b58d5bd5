//! App Proxy Gateway - Main Application Entry Point
//!
//! This server sits behind the platform's app proxy. The platform forwards
//! storefront requests here and signs each one with the app's shared secret.
//! Every proxied request is authenticated before it reaches a handler; the
//! handlers then call the shop's admin API and reshape the answer.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Authentication**: HMAC-SHA256 proxy signatures (`signature` or `hmac` parameter)
//! - **Upstream**: admin REST and GraphQL API via reqwest
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Build the authentication gate and admin API client
//! 3. Build HTTP router with routes and middleware
//! 4. Start server on configured port

mod config;
mod error;
mod handlers;
mod middleware;
mod models;
mod services;
mod state;

use tracing_subscriber::EnvFilter;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the HTTP router.
///
/// `/proxy/health` is public; every other route sits behind the proxy
/// authentication gate and receives the caller's `ShopIdentity`.
fn build_router(state: AppState) -> Router {
    let proxied_routes = Router::new()
        .route("/proxy/order", get(handlers::orders::lookup_order))
        .route("/proxy/stock", get(handlers::stock::product_stock))
        .route("/proxy/upload/start", post(handlers::uploads::start_upload))
        .route(
            "/proxy/upload/complete",
            post(handlers::uploads::complete_upload),
        )
        // Authenticate every route in this group
        .route_layer(axum_middleware::from_fn_with_state(
            state.auth.clone(),
            middleware::auth::proxy_auth_middleware,
        ));

    Router::new()
        .route("/proxy/health", get(handlers::health::health_check))
        .merge(proxied_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    let state = AppState::from_config(&config)?;
    if !state.auth.is_configured() {
        tracing::warn!("SHOPIFY_API_SECRET is not set; proxied routes will answer missing_secret");
    }
    if config.shopify_admin_token.is_none() {
        tracing::warn!("SHOPIFY_ADMIN_TOKEN is not set; admin API calls will fail");
    }

    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("App proxy gateway listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SharedSecret;
    use crate::middleware::auth::ProxyAuth;
    use crate::models::proxy_request::QueryParams;
    use crate::services::admin_api::{AdminApi, DEFAULT_API_VERSION};
    use crate::services::proxy_signature::{path_scoped_message, sign_hex};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const SECRET: &str = "s3cr3t";

    fn app_with_secret(secret: Option<&str>) -> Router {
        let auth = ProxyAuth::new(secret.map(SharedSecret::new));
        let admin = AdminApi::new(None, DEFAULT_API_VERSION).unwrap();
        build_router(AppState::new(auth, admin))
    }

    fn signed_uri(path: &str, pairs: &[(&str, &str)]) -> String {
        let query: QueryParams = pairs.iter().copied().collect();
        let signature =
            sign_hex(&SharedSecret::new(SECRET), &path_scoped_message(path, &query)).unwrap();
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (k, v) in pairs {
            serializer.append_pair(k, v);
        }
        serializer.append_pair("signature", &signature);
        format!("{path}?{}", serializer.finish())
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        let (status, body) = send(app_with_secret(None), get_request("/proxy/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn proxied_routes_require_a_shop() {
        let (status, body) = send(app_with_secret(Some(SECRET)), get_request("/proxy/order")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "missing_shop" }));
    }

    #[tokio::test]
    async fn proxied_routes_require_a_signature() {
        let (status, body) = send(
            app_with_secret(Some(SECRET)),
            get_request("/proxy/stock?shop=demo&productId=gid%3A%2F%2Fshopify%2FProduct%2F1"),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "missing_signature" }));
    }

    #[tokio::test]
    async fn unconfigured_secret_is_a_server_error() {
        let uri = signed_uri("/proxy/order", &[("shop", "demo")]);
        let (status, body) = send(app_with_secret(None), get_request(&uri)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "missing_secret" }));
    }

    #[tokio::test]
    async fn authenticated_order_lookup_validates_params_before_calling_upstream() {
        let uri = signed_uri("/proxy/order", &[("shop", "demo"), ("number", "1001")]);
        let (status, body) = send(app_with_secret(Some(SECRET)), get_request(&uri)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "missing_params" }));
    }

    #[tokio::test]
    async fn authenticated_stock_requires_product_id() {
        let uri = signed_uri("/proxy/stock", &[("shop", "demo")]);
        let (status, body) = send(app_with_secret(Some(SECRET)), get_request(&uri)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "missing_productId" }));
    }

    #[tokio::test]
    async fn authenticated_upload_start_requires_body_fields() {
        let uri = signed_uri("/proxy/upload/start", &[("shop", "demo")]);
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(r#"{"filename":"receipt.pdf"}"#))
            .unwrap();

        let (status, body) = send(app_with_secret(Some(SECRET)), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "missing_params" }));
    }

    #[tokio::test]
    async fn missing_admin_token_surfaces_as_server_error() {
        let uri = signed_uri(
            "/proxy/order",
            &[("shop", "demo"), ("number", "1001"), ("email", "a@b.com")],
        );
        let (status, body) = send(app_with_secret(Some(SECRET)), get_request(&uri)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "server_error");
        assert!(body["detail"].as_str().unwrap().contains("access token"));
    }

    #[tokio::test]
    async fn forged_upload_complete_is_rejected() {
        let uri = signed_uri("/proxy/upload/complete", &[("shop", "demo")])
            .replace("shop=demo", "shop=victim");
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::from(r#"{"token":"t","filename":"f.pdf"}"#))
            .unwrap();

        let (status, body) = send(app_with_secret(Some(SECRET)), request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "bad_signature" }));
    }
}
