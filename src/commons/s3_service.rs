use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use aws_sdk_s3::{
    config::{Credentials, Region},
    presigning::PresigningConfig,
    Client,
};

use crate::config::AwsSettings;

/// Capability to mint a time-limited upload URL for one object key.
///
/// The endpoint only ever needs this single operation, so tests substitute a
/// stub and never touch the network.
#[async_trait]
pub trait UploadSigner: Send + Sync {
    async fn sign_put(&self, key: &str, content_type: &str, expires_in: Duration) -> Result<String>;
}

#[derive(Clone)]
pub struct S3Service {
    client: Client,
    bucket: String,
}

impl S3Service {
    pub fn new(settings: &AwsSettings) -> Self {
        let config = aws_sdk_s3::config::Builder::new()
            .region(Region::new(settings.region.clone()))
            .credentials_provider(Credentials::new(
                settings.access_key_id.clone(),
                settings.secret_access_key.clone(),
                None,
                None,
                "awcs",
            ))
            .behavior_version_latest()
            .build();

        Self {
            client: Client::from_conf(config),
            bucket: settings.bucket.clone(),
        }
    }
}

#[async_trait]
impl UploadSigner for S3Service {
    async fn sign_put(&self, key: &str, content_type: &str, expires_in: Duration) -> Result<String> {
        let presigned_config = PresigningConfig::builder()
            .expires_in(expires_in)
            .build()?;

        let presigned_request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .presigned(presigned_config)
            .await?;

        log::info!("Signed upload URL for key: {}", key);

        Ok(presigned_request.uri().to_string())
    }
}
