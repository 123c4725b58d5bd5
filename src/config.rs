//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use std::fmt;

use serde::Deserialize;

/// Opaque secret value loaded from the environment.
///
/// The wrapped string is only reachable through [`SharedSecret::reveal`].
/// `Debug` prints `****`, so a secret never ends up in logs even when the
/// surrounding struct is logged with `{:?}`.
#[derive(Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct SharedSecret(String);

impl SharedSecret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn reveal(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `SHOPIFY_API_SECRET` (optional): app secret used to verify proxied requests.
///   Without it every proxied route answers `missing_secret`.
/// - `SHOPIFY_ADMIN_TOKEN` (optional): access token for the admin API
/// - `SHOPIFY_API_VERSION` (optional): admin API version, defaults to 2025-07
/// - `PORT` (optional): HTTP server port, defaults to 3000
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub shopify_api_secret: Option<SharedSecret>,

    pub shopify_admin_token: Option<SharedSecret>,

    #[serde(default = "default_api_version")]
    pub shopify_api_version: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Default port if PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

fn default_api_version() -> String {
    crate::services::admin_api::DEFAULT_API_VERSION.to_string()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable value cannot be parsed into
    /// its expected type (e.g. a non-numeric `PORT`).
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        envy::from_env::<Config>()
    }
}
