use super::ImageHostingService;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct MockImageHost {
    base_url: String,
    sources: Arc<Mutex<Vec<String>>>,
    failure: Option<String>,
}

impl MockImageHost {
    pub fn new() -> Self {
        Self {
            base_url: "https://mock-cdn.example.com/stories".to_string(),
            sources: Arc::new(Mutex::new(Vec::new())),
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

    /// Source URLs passed to `rehost`, in call order.
    pub fn get_sources(&self) -> Vec<String> {
        self.sources.lock().unwrap().clone()
    }
}

impl Default for MockImageHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageHostingService for MockImageHost {
    async fn rehost(&self, source_url: &str) -> Result<String> {
        let count = {
            let mut sources = self.sources.lock().unwrap();
            sources.push(source_url.to_string());
            sources.len()
        };

        if let Some(message) = &self.failure {
            return Err(Error::S3(message.clone()));
        }

        Ok(format!("{}/{}.png", self.base_url, count))
    }
}
