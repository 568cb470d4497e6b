use serde::Serialize;

/// The capture grant returned to the mobile app. Exists only in this
/// response; the server keeps no record of it.
#[derive(Debug, Serialize)]
pub struct UploadGrant {
    pub capture_id: String,
    pub photo_put_url: String,
    pub summary_put_url: String,
    pub expires_in_seconds: u64,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}
