use super::CdnService;
use crate::models::Config;
use crate::{Error, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client as S3Client;

// Object keys are random, so an uploaded illustration never changes.
const CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Illustration bucket on an S3-compatible object store.
pub struct CdnClient {
    s3: S3Client,
    bucket: String,
    public_base: String,
}

impl CdnClient {
    /// Connect using the `CDN_*` settings. Fails if either credential is missing.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let (Some(key_id), Some(secret)) = (
            config.cdn_access_key_id.as_deref(),
            config.cdn_secret_access_key.as_deref(),
        ) else {
            return Err(Error::Config(
                "CDN_ACCESS_KEY_ID and CDN_SECRET_ACCESS_KEY are required for re-hosting"
                    .to_string(),
            ));
        };

        // The endpoint decides where objects go; the SDK still wants some region.
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .credentials_provider(Credentials::new(key_id, secret, None, None, "story-cdn"))
            .region(Region::new("us-east-1"))
            .endpoint_url(&config.cdn_endpoint)
            .load()
            .await;

        Ok(Self {
            s3: S3Client::new(&sdk_config),
            bucket: config.cdn_bucket.clone(),
            public_base: config.cdn_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl CdnService for CdnClient {
    async fn upload_file(&self, key: &str, data: &[u8], content_type: &str) -> Result<String> {
        self.s3
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data.to_vec()))
            .content_type(content_type)
            .cache_control(CACHE_CONTROL)
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| Error::S3(format!("Upload of {} failed: {}", key, e)))?;

        tracing::debug!("Stored {} ({} bytes) in {}", key, data.len(), self.bucket);
        Ok(format!("{}/{}", self.public_base, key))
    }
}
