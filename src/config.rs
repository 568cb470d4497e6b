use std::env;

/// Deployment configuration, read once at startup and injected as app data.
///
/// The AWS fields are optional on purpose: an incomplete deployment must keep
/// serving requests and answer them with the misconfiguration error, not crash
/// the process at boot.
#[derive(Clone)]
pub struct CaptureConfig {
    pub aws_region: Option<String>,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub s3_bucket: Option<String>,
    pub capture_api_key: Option<String>,
}

/// The complete set of values needed to build an S3 signing client.
#[derive(Clone)]
pub struct AwsSettings {
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
}

impl CaptureConfig {
    pub fn from_env() -> Self {
        Self {
            aws_region: non_empty(env::var("AWS_REGION").ok()),
            aws_access_key_id: non_empty(env::var("AWS_ACCESS_KEY_ID").ok()),
            aws_secret_access_key: non_empty(env::var("AWS_SECRET_ACCESS_KEY").ok()),
            s3_bucket: non_empty(env::var("AWCS_S3_BUCKET").ok()),
            capture_api_key: non_empty(env::var("AWCS_CAPTURE_API_KEY").ok()),
        }
    }

    /// Returns the full AWS settings, or `None` if any required value is absent.
    pub fn aws_settings(&self) -> Option<AwsSettings> {
        Some(AwsSettings {
            region: self.aws_region.clone()?,
            access_key_id: self.aws_access_key_id.clone()?,
            secret_access_key: self.aws_secret_access_key.clone()?,
            bucket: self.s3_bucket.clone()?,
        })
    }

    /// The caller secret, if one is configured. A blank value counts as
    /// unconfigured so a stray `AWCS_CAPTURE_API_KEY=` line does not lock
    /// every caller out.
    pub fn required_api_key(&self) -> Option<&str> {
        self.capture_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
