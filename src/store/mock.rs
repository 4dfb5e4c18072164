use super::{InMemoryStoryStore, StoryStore};
use crate::models::{NewStory, Story};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// In-memory store that can be switched into an "unavailable" mode.
#[derive(Clone)]
pub struct MockStoryStore {
    inner: InMemoryStoryStore,
    failure: Option<String>,
    call_count: Arc<Mutex<usize>>,
}

impl MockStoryStore {
    pub fn new() -> Self {
        Self {
            inner: InMemoryStoryStore::new(),
            failure: None,
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Make every call fail with `StorageUnavailable` carrying `message`.
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn check(&self) -> Result<()> {
        *self.call_count.lock().unwrap() += 1;
        match &self.failure {
            Some(message) => Err(Error::StorageUnavailable(message.clone())),
            None => Ok(()),
        }
    }
}

impl Default for MockStoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoryStore for MockStoryStore {
    async fn list_all(&self) -> Result<Vec<Story>> {
        self.check()?;
        self.inner.list_all().await
    }

    async fn save(&self, story: NewStory) -> Result<Story> {
        self.check()?;
        self.inner.save(story).await
    }

    async fn delete(&self, id: i32) -> Result<()> {
        self.check()?;
        self.inner.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_story() -> NewStory {
        NewStory {
            name: "Lily".to_string(),
            character: "unicorn".to_string(),
            topic: "space".to_string(),
            story: "Lily flew.".to_string(),
            image_url: String::new(),
        }
    }

    #[tokio::test]
    async fn test_mock_store_passes_through_when_healthy() {
        let store = MockStoryStore::new();
        let saved = store.save(new_story()).await.unwrap();

        assert_eq!(store.list_all().await.unwrap(), vec![saved]);
        assert_eq!(store.get_call_count(), 2);
    }

    #[tokio::test]
    async fn test_failing_mock_store_rejects_every_operation() {
        let store = MockStoryStore::new().failing("db down");

        assert!(matches!(
            store.list_all().await,
            Err(Error::StorageUnavailable(_))
        ));
        assert!(matches!(
            store.save(new_story()).await,
            Err(Error::StorageUnavailable(_))
        ));
        assert!(matches!(
            store.delete(1).await,
            Err(Error::StorageUnavailable(_))
        ));
        assert!(store.is_empty());
        assert_eq!(store.get_call_count(), 3);
    }
}
