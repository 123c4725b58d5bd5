//! Staged upload models.
//!
//! Uploads happen in two steps:
//!
//! 1. `POST /proxy/upload/start` asks the admin API for a staged upload target.
//!    The storefront posts the file straight to `uploadUrl` with `formData`.
//! 2. `POST /proxy/upload/complete` turns the uploaded resource (`token`) into
//!    a file and returns its URL.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Body of `POST /proxy/upload/start`.
#[derive(Debug, Default, Deserialize)]
pub struct UploadStartRequest {
    pub filename: Option<String>,
    pub mime: Option<String>,
    pub size: Option<u64>,
}

/// Validated upload start parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedUploadInput {
    pub filename: String,
    pub mime: String,
    pub size: u64,
}

impl UploadStartRequest {
    /// All three fields present, strings non-empty and size non-zero.
    pub fn validate(self) -> Option<StagedUploadInput> {
        let filename = self.filename.filter(|s| !s.is_empty())?;
        let mime = self.mime.filter(|s| !s.is_empty())?;
        let size = self.size.filter(|size| *size > 0)?;
        Some(StagedUploadInput {
            filename,
            mime,
            size,
        })
    }
}

/// `data` of the `stagedUploadsCreate` mutation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagedUploadsData {
    pub staged_uploads_create: Option<StagedUploadsPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagedUploadsPayload {
    #[serde(default)]
    pub staged_targets: Vec<StagedTarget>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagedTarget {
    pub url: String,
    pub resource_url: String,
    #[serde(default)]
    pub parameters: Vec<StagedParameter>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StagedParameter {
    pub name: String,
    pub value: String,
}

impl StagedUploadsData {
    pub fn into_first_target(self) -> Option<StagedTarget> {
        self.staged_uploads_create?.staged_targets.into_iter().next()
    }
}

/// Response of `POST /proxy/upload/start`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadStartResponse {
    pub method: &'static str,
    pub upload_url: String,
    pub form_data: BTreeMap<String, String>,
    /// Resource URL to hand back to `/proxy/upload/complete`
    pub token: String,
}

impl From<StagedTarget> for UploadStartResponse {
    fn from(target: StagedTarget) -> Self {
        Self {
            method: "POST",
            upload_url: target.url,
            form_data: target
                .parameters
                .into_iter()
                .map(|p| (p.name, p.value))
                .collect(),
            token: target.resource_url,
        }
    }
}

/// Body of `POST /proxy/upload/complete`.
#[derive(Debug, Default, Deserialize)]
pub struct UploadCompleteRequest {
    pub token: Option<String>,
    pub filename: Option<String>,
}

impl UploadCompleteRequest {
    /// `(token, filename)`, both non-empty.
    pub fn validate(self) -> Option<(String, String)> {
        let token = self.token.filter(|s| !s.is_empty())?;
        let filename = self.filename.filter(|s| !s.is_empty())?;
        Some((token, filename))
    }
}

/// `data` of the `fileCreate` mutation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileCreateData {
    pub file_create: Option<FileCreatePayload>,
}

#[derive(Debug, Deserialize)]
pub struct FileCreatePayload {
    #[serde(default)]
    pub files: Vec<CreatedFile>,
}

#[derive(Debug, Deserialize)]
pub struct CreatedFile {
    pub url: Option<String>,
}

impl FileCreateData {
    pub fn into_first_url(self) -> Option<String> {
        self.file_create?.files.into_iter().next()?.url
    }
}

/// Response of `POST /proxy/upload/complete`.
#[derive(Debug, Serialize)]
pub struct UploadCompleteResponse {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn start_request_requires_all_fields() {
        let full: UploadStartRequest = serde_json::from_value(json!({
            "filename": "receipt.pdf", "mime": "application/pdf", "size": 2048
        }))
        .unwrap();
        assert_eq!(
            full.validate(),
            Some(StagedUploadInput {
                filename: "receipt.pdf".into(),
                mime: "application/pdf".into(),
                size: 2048,
            })
        );

        let zero: UploadStartRequest = serde_json::from_value(json!({
            "filename": "receipt.pdf", "mime": "application/pdf", "size": 0
        }))
        .unwrap();
        assert_eq!(zero.validate(), None);

        assert_eq!(UploadStartRequest::default().validate(), None);
    }

    #[test]
    fn staged_target_becomes_upload_form() {
        let data: StagedUploadsData = serde_json::from_value(json!({
            "stagedUploadsCreate": {
                "stagedTargets": [{
                    "url": "https://storage.example/upload",
                    "resourceUrl": "https://storage.example/tmp/receipt.pdf",
                    "parameters": [
                        { "name": "key", "value": "tmp/receipt.pdf" },
                        { "name": "Content-Type", "value": "application/pdf" }
                    ]
                }],
                "userErrors": []
            }
        }))
        .unwrap();

        let response = UploadStartResponse::from(data.into_first_target().unwrap());

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "method": "POST",
                "uploadUrl": "https://storage.example/upload",
                "formData": {
                    "Content-Type": "application/pdf",
                    "key": "tmp/receipt.pdf"
                },
                "token": "https://storage.example/tmp/receipt.pdf"
            })
        );
    }

    #[test]
    fn missing_staged_target_is_none() {
        let data: StagedUploadsData =
            serde_json::from_value(json!({ "stagedUploadsCreate": { "stagedTargets": [] } }))
                .unwrap();
        assert!(data.into_first_target().is_none());
        assert!(StagedUploadsData::default().into_first_target().is_none());
    }

    #[test]
    fn file_create_url_is_extracted() {
        let data: FileCreateData = serde_json::from_value(json!({
            "fileCreate": { "files": [{ "url": "https://cdn.example/receipt.pdf", "alt": "receipt.pdf" }] }
        }))
        .unwrap();
        assert_eq!(
            data.into_first_url().as_deref(),
            Some("https://cdn.example/receipt.pdf")
        );

        let pending: FileCreateData =
            serde_json::from_value(json!({ "fileCreate": { "files": [{ "url": null }] } }))
                .unwrap();
        assert!(pending.into_first_url().is_none());
    }

    #[test]
    fn complete_request_requires_token_and_filename() {
        let request: UploadCompleteRequest =
            serde_json::from_value(json!({ "token": "t", "filename": "f.pdf" })).unwrap();
        assert_eq!(request.validate(), Some(("t".into(), "f.pdf".into())));

        let request: UploadCompleteRequest =
            serde_json::from_value(json!({ "token": "t" })).unwrap();
        assert_eq!(request.validate(), None);
    }
}
