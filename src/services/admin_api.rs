//! Admin API client for the shop behind an authenticated request.
//!
//! Every call targets `https://<shop>/admin/api/<version>/...` and carries the
//! app's admin access token in `X-Shopify-Access-Token`. The shop always comes
//! from the authenticated `ShopIdentity`, never from request input directly.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::config::SharedSecret;
use crate::error::AppError;
use crate::models::order::{AdminOrder, OrdersEnvelope, ProductEnvelope};
use crate::models::shop::ShopIdentity;
use crate::models::stock::{AdminVariant, ProductVariantsData};
use crate::models::upload::{FileCreateData, StagedTarget, StagedUploadInput, StagedUploadsData};

/// Admin API version used when `SHOPIFY_API_VERSION` is not set.
pub const DEFAULT_API_VERSION: &str = "2025-07";

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

const PRODUCT_VARIANTS_QUERY: &str = r#"
query($id: ID!) {
  product(id: $id) {
    variants(first: 100) {
      nodes { id title availableForSale }
    }
  }
}"#;

const STAGED_UPLOADS_CREATE: &str = r#"
mutation($input: [StagedUploadInput!]!) {
  stagedUploadsCreate(input: $input) {
    stagedTargets { url resourceUrl parameters { name value } }
    userErrors { field message }
  }
}"#;

const FILE_CREATE: &str = r#"
mutation($files: [FileCreateInput!]!) {
  fileCreate(files: $files) {
    files { url alt }
    userErrors { field message }
  }
}"#;

#[derive(Debug, Clone)]
pub struct AdminApi {
    client: Client,
    access_token: Option<SharedSecret>,
    api_version: String,
}

impl AdminApi {
    /// Build the client.
    ///
    /// A missing token does not fail construction; every call made without
    /// one fails instead, so the proxy can still start and authenticate.
    pub fn new(
        access_token: Option<SharedSecret>,
        api_version: impl Into<String>,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            client,
            access_token: access_token.filter(|t| !t.is_empty()),
            api_version: api_version.into(),
        })
    }

    pub fn url(&self, shop: &ShopIdentity, path: &str) -> String {
        format!("https://{}/admin/api/{}{path}", shop, self.api_version)
    }

    fn token(&self) -> Result<&str, AppError> {
        self.access_token
            .as_ref()
            .map(SharedSecret::reveal)
            .ok_or_else(|| AppError::Upstream("Admin access token is not configured".to_string()))
    }

    /// `GET` a REST resource and decode its JSON body.
    pub async fn rest_get<T: DeserializeOwned>(
        &self,
        shop: &ShopIdentity,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, AppError> {
        let url = self.url(shop, path);
        tracing::debug!("Admin REST GET {}", url);

        let mut request = self.client.get(url).header(ACCESS_TOKEN_HEADER, self.token()?);
        if !params.is_empty() {
            request = request.query(params);
        }

        let response = ensure_success(request.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    /// Run a GraphQL query or mutation and decode its `data`.
    ///
    /// `data: null` decodes as `T::default()`.
    pub async fn graphql<T: DeserializeOwned + Default>(
        &self,
        shop: &ShopIdentity,
        query: &str,
        variables: Value,
    ) -> Result<T, AppError> {
        let url = self.url(shop, "/graphql.json");
        tracing::debug!("Admin GraphQL POST {}", url);

        let response = self
            .client
            .post(url)
            .header(ACCESS_TOKEN_HEADER, self.token()?)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;
        let body = ensure_success(response).await?.json::<Value>().await?;

        let data = graphql_data(body)?;
        if data.is_null() {
            return Ok(T::default());
        }
        serde_json::from_value(data)
            .map_err(|e| AppError::Upstream(format!("Unexpected GraphQL response: {e}")))
    }

    /// Find an order by its number (without `#`) and customer email.
    pub async fn find_order(
        &self,
        shop: &ShopIdentity,
        number: &str,
        email: &str,
    ) -> Result<Option<AdminOrder>, AppError> {
        let name = format!("#{number}");
        let envelope: OrdersEnvelope = self
            .rest_get(
                shop,
                "/orders.json",
                &[
                    ("name", name.as_str()),
                    ("email", email),
                    ("status", "any"),
                    ("fields", "id,currency,line_items"),
                ],
            )
            .await?;

        Ok(envelope.orders.into_iter().next())
    }

    /// URL handle of a product, empty if the product has none.
    pub async fn product_handle(
        &self,
        shop: &ShopIdentity,
        product_id: u64,
    ) -> Result<String, AppError> {
        let envelope: ProductEnvelope = self
            .rest_get(shop, &format!("/products/{product_id}.json"), &[])
            .await?;

        Ok(envelope
            .product
            .map(|product| product.handle)
            .unwrap_or_default())
    }

    /// First 100 variants of a product, given its global id.
    pub async fn product_variants(
        &self,
        shop: &ShopIdentity,
        product_gid: &str,
    ) -> Result<Vec<AdminVariant>, AppError> {
        let data: ProductVariantsData = self
            .graphql(shop, PRODUCT_VARIANTS_QUERY, json!({ "id": product_gid }))
            .await?;

        Ok(data.into_variants())
    }

    /// Ask for a staged upload target for one file.
    pub async fn staged_upload(
        &self,
        shop: &ShopIdentity,
        input: &StagedUploadInput,
    ) -> Result<Option<StagedTarget>, AppError> {
        let variables = json!({
            "input": [{
                "resource": "FILE",
                "filename": input.filename,
                "mimeType": input.mime,
                "fileSize": input.size.to_string(),
                "httpMethod": "POST",
            }]
        });
        let data: StagedUploadsData = self.graphql(shop, STAGED_UPLOADS_CREATE, variables).await?;

        Ok(data.into_first_target())
    }

    /// Create a file from an uploaded resource; returns its URL once available.
    pub async fn file_create(
        &self,
        shop: &ShopIdentity,
        token: &str,
        filename: &str,
    ) -> Result<Option<String>, AppError> {
        let variables = json!({
            "files": [{
                "alt": filename,
                "contentType": "FILE",
                "originalSource": token,
            }]
        });
        let data: FileCreateData = self.graphql(shop, FILE_CREATE, variables).await?;

        Ok(data.into_first_url())
    }
}

/// Turn a non-2xx response into an error carrying its body text.
async fn ensure_success(response: Response) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.text().await {
        Ok(text) if !text.is_empty() => text,
        _ => format!("HTTP {}", status.as_u16()),
    };
    Err(AppError::Upstream(message))
}

/// Extract `data` from a GraphQL response body.
///
/// Fails on a non-empty top-level `errors` array or a non-empty
/// `data.userErrors` array.
pub fn graphql_data(mut body: Value) -> Result<Value, AppError> {
    if let Some(errors) = body.get("errors").filter(|e| !is_empty_list(e)) {
        return Err(AppError::Upstream(errors.to_string()));
    }

    let data = body.get_mut("data").map(Value::take).unwrap_or(Value::Null);
    if let Some(user_errors) = data.get("userErrors").filter(|e| !is_empty_list(e)) {
        return Err(AppError::Upstream(user_errors.to_string()));
    }

    Ok(data)
}

fn is_empty_list(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
