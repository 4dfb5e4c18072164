use super::CdnService;
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// An uploaded object as seen by the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFile {
    pub data: Vec<u8>,
    pub content_type: String,
}

#[derive(Clone)]
pub struct MockCdnClient {
    files: Arc<Mutex<HashMap<String, StoredFile>>>,
    base_url: String,
    upload_count: Arc<Mutex<usize>>,
    failure: Option<String>,
}

impl MockCdnClient {
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
            base_url: "https://mock-cdn.example.com".to_string(),
            upload_count: Arc::new(Mutex::new(0)),
            failure: None,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn get_upload_count(&self) -> usize {
        *self.upload_count.lock().unwrap()
    }

    pub fn get_files(&self) -> HashMap<String, StoredFile> {
        self.files.lock().unwrap().clone()
    }
}

impl Default for MockCdnClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CdnService for MockCdnClient {
    async fn upload_file(&self, key: &str, data: &[u8], content_type: &str) -> Result<String> {
        *self.upload_count.lock().unwrap() += 1;

        if let Some(message) = &self.failure {
            return Err(Error::S3(message.clone()));
        }

        self.files.lock().unwrap().insert(
            key.to_string(),
            StoredFile {
                data: data.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        Ok(format!("{}/{}", self.base_url, key))
    }
}
