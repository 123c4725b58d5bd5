//! Staged upload handlers.
//!
//! - POST /proxy/upload/start - Get a staged upload target
//! - POST /proxy/upload/complete - Turn the uploaded resource into a file

use axum::{Extension, Json, body::Bytes, extract::State};
use serde::de::DeserializeOwned;

use crate::{
    error::AppError,
    models::{
        shop::ShopIdentity,
        upload::{
            UploadCompleteRequest, UploadCompleteResponse, UploadStartRequest,
            UploadStartResponse,
        },
    },
    state::AppState,
};

/// Decode an optional JSON body. An empty body is the default value; a body
/// that is not the expected JSON counts as missing parameters.
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, AppError> {
    if body.is_empty() {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("Rejected upload body: {}", e);
        AppError::MissingParams
    })
}

/// Start an upload.
///
/// # Request Body
///
/// ```json
/// { "filename": "receipt.pdf", "mime": "application/pdf", "size": 2048 }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: `{ method, uploadUrl, formData, token }`
/// - **Error (400)**: `missing_params`
/// - **Error (500)**: `staged_failed` when no target is returned, `server_error` on API failure
pub async fn start_upload(
    State(state): State<AppState>,
    Extension(shop): Extension<ShopIdentity>,
    body: Bytes,
) -> Result<Json<UploadStartResponse>, AppError> {
    let input = parse_body::<UploadStartRequest>(&body)?
        .validate()
        .ok_or(AppError::MissingParams)?;

    let target = state
        .admin
        .staged_upload(&shop, &input)
        .await?
        .ok_or(AppError::StagedUploadFailed)?;

    tracing::info!("Staged upload of {} for {}", input.filename, shop);
    Ok(Json(target.into()))
}

/// Complete an upload.
///
/// # Request Body
///
/// ```json
/// { "token": "<token from start>", "filename": "receipt.pdf" }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: `{ "url": "..." }`
/// - **Error (400)**: `missing_params`
/// - **Error (500)**: `file_create_failed` when no file URL is returned, `server_error` on API failure
pub async fn complete_upload(
    State(state): State<AppState>,
    Extension(shop): Extension<ShopIdentity>,
    body: Bytes,
) -> Result<Json<UploadCompleteResponse>, AppError> {
    let (token, filename) = parse_body::<UploadCompleteRequest>(&body)?
        .validate()
        .ok_or(AppError::MissingParams)?;

    let url = state
        .admin
        .file_create(&shop, &token, &filename)
        .await?
        .ok_or(AppError::FileCreateFailed)?;

    Ok(Json(UploadCompleteResponse { url }))
}
