//! Re-hosting of generated illustrations
//!
//! Image providers hand back short-lived URLs. Before a story is stored, the
//! image is copied to storage we control and the resulting permanent URL is
//! used instead.

pub mod mime;
pub mod mock;

pub use mock::MockImageHost;

use crate::cdn::CdnService;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use uuid::Uuid;

#[async_trait]
pub trait ImageHostingService: Send + Sync {
    /// Copy the image at `source_url` somewhere durable and return its permanent URL.
    async fn rehost(&self, source_url: &str) -> Result<String>;
}

/// Downloads the source image over HTTP and uploads it through a [`CdnService`].
pub struct CdnImageHost {
    client: Client,
    cdn: Box<dyn CdnService>,
    key_prefix: String,
}

impl CdnImageHost {
    pub fn new(client: Client, cdn: Box<dyn CdnService>) -> Self {
        Self {
            client,
            cdn,
            key_prefix: "stories".to_string(),
        }
    }

    pub fn with_key_prefix(mut self, key_prefix: &str) -> Self {
        self.key_prefix = key_prefix.trim_matches('/').to_string();
        self
    }

    async fn download(&self, source_url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(source_url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!("Image download failed (status {}): {}", status, source_url);
            return Err(Error::S3(format!(
                "Failed to download image (status {})",
                status
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl ImageHostingService for CdnImageHost {
    async fn rehost(&self, source_url: &str) -> Result<String> {
        let data = self.download(source_url).await?;
        let (content_type, extension) = mime::detect_image_mime(&data);
        let key = format!("{}/{}.{}", self.key_prefix, Uuid::new_v4(), extension);

        tracing::debug!("Re-hosting {} bytes as {}", data.len(), key);
        self.cdn.upload_file(&key, &data, content_type).await
    }
}
