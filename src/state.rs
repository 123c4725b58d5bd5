//! Shared application state.

use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::middleware::auth::ProxyAuth;
use crate::services::admin_api::AdminApi;

/// State shared by all handlers via `State<AppState>`.
///
/// Cheap to clone: the gate sits behind an `Arc` and `reqwest::Client` is
/// reference-counted internally. Nothing in here is mutated after startup.
#[derive(Debug, Clone)]
pub struct AppState {
    pub auth: Arc<ProxyAuth>,
    pub admin: AdminApi,
}

impl AppState {
    pub fn new(auth: ProxyAuth, admin: AdminApi) -> Self {
        Self {
            auth: Arc::new(auth),
            admin,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let auth = ProxyAuth::new(config.shopify_api_secret.clone());
        let admin = AdminApi::new(
            config.shopify_admin_token.clone(),
            config.shopify_api_version.clone(),
        )?;
        Ok(Self::new(auth, admin))
    }
}
