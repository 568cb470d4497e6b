use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    captures::dto::capture_init_response::UploadGrant,
    commons::s3_service::{S3Service, UploadSigner},
    config::CaptureConfig,
};

pub const EXPIRES_IN_SECONDS: u64 = 900;

const ALLOWED_CONTENT_TYPES: [&str; 3] = ["image/jpeg", "image/heic", "image/heif"];
const ALLOWED_FILE_EXTS: [&str; 2] = ["jpg", "heic"];

/// Everything that can go wrong while issuing a grant. The display strings
/// are the `error` fields the clients key on.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Missing or invalid x-awcs-capture-key")]
    Forbidden,
    #[error("Server misconfigured: missing required AWS environment variables.")]
    Misconfigured,
    #[error("Invalid JSON body")]
    InvalidJson,
    #[error("Invalid input: content_type must be image/jpeg|image/heic|image/heif and file_ext must be jpg|heic")]
    InvalidInput,
    #[error("Failed to generate pre-signed URL")]
    Signing(anyhow::Error),
}

impl From<anyhow::Error> for CaptureError {
    fn from(source: anyhow::Error) -> Self {
        CaptureError::Signing(source)
    }
}

#[derive(Debug, Default)]
pub struct CaptureInitRequest {
    pub content_type: Option<String>,
    pub file_ext: Option<String>,
}

pub struct CaptureService {
    config: CaptureConfig,
}

impl CaptureService {
    pub fn new(config: CaptureConfig) -> Self {
        Self { config }
    }

    /// Runs the full validation chain and, if it passes, signs a fresh grant.
    /// Checks run in a fixed order with the secret check first, so a probe
    /// without the key learns nothing about the deployment's configuration.
    pub async fn issue_grant(
        &self,
        presented_key: Option<&str>,
        raw_body: &[u8],
    ) -> Result<UploadGrant, CaptureError> {
        self.authorize(presented_key)?;

        let settings = self
            .config
            .aws_settings()
            .ok_or(CaptureError::Misconfigured)?;

        let request = parse_body(raw_body)?;
        let (content_type, file_ext) = validate_fields(&request)?;

        let signer = S3Service::new(&settings);
        self.sign_grant(&signer, content_type, file_ext).await
    }

    fn authorize(&self, presented_key: Option<&str>) -> Result<(), CaptureError> {
        match self.config.required_api_key() {
            Some(required) if presented_key != Some(required) => Err(CaptureError::Forbidden),
            _ => Ok(()),
        }
    }

    /// Mints a capture id, derives both object keys from it and signs one
    /// upload URL per key. Either both URLs come back or the caller gets the
    /// error; a half-signed grant is never returned.
    pub async fn sign_grant(
        &self,
        signer: &dyn UploadSigner,
        content_type: &str,
        file_ext: &str,
    ) -> Result<UploadGrant, CaptureError> {
        let capture_id = Uuid::new_v4().to_string();
        let photo_key = format!("captures/{}/photo.{}", capture_id, file_ext);
        let summary_key = format!("captures/{}/summary.json", capture_id);
        let expires_in = Duration::from_secs(EXPIRES_IN_SECONDS);

        let photo_put_url = signer.sign_put(&photo_key, content_type, expires_in).await?;
        let summary_put_url = signer
            .sign_put(&summary_key, "application/json", expires_in)
            .await?;

        Ok(UploadGrant {
            capture_id,
            photo_put_url,
            summary_put_url,
            expires_in_seconds: EXPIRES_IN_SECONDS,
        })
    }
}

/// An absent body is treated as an empty object, so it falls through to the
/// field validation error rather than the JSON parse error. Non-object JSON
/// (`"x"`, `[1]`) parses fine and simply has no usable fields.
fn parse_body(raw: &[u8]) -> Result<CaptureInitRequest, CaptureError> {
    if raw.is_empty() {
        return Ok(CaptureInitRequest::default());
    }

    let value: Value = serde_json::from_slice(raw).map_err(|_| CaptureError::InvalidJson)?;

    Ok(CaptureInitRequest {
        content_type: value
            .get("content_type")
            .and_then(Value::as_str)
            .map(str::to_string),
        file_ext: value
            .get("file_ext")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

/// The two allow-sets are checked independently; pairing `image/jpeg` with
/// `file_ext=heic` is accepted.
fn validate_fields(request: &CaptureInitRequest) -> Result<(&str, &str), CaptureError> {
    let content_type = request
        .content_type
        .as_deref()
        .filter(|ct| ALLOWED_CONTENT_TYPES.contains(ct));
    let file_ext = request
        .file_ext
        .as_deref()
        .filter(|ext| ALLOWED_FILE_EXTS.contains(ext));

    match (content_type, file_ext) {
        (Some(ct), Some(ext)) => Ok((ct, ext)),
        _ => Err(CaptureError::InvalidInput),
    }
}
