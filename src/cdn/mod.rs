//! CDN integration for storing generated illustrations
//!
//! Uploads files to S3-compatible storage (DigitalOcean Spaces) and returns
//! their public URLs.

pub mod client;
pub mod mock;

pub use client::CdnClient;
pub use mock::MockCdnClient;

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait CdnService: Send + Sync {
    /// Store `data` under `key` and return its public URL.
    async fn upload_file(&self, key: &str, data: &[u8], content_type: &str) -> Result<String>;
}
