use super::StoryStore;
use crate::models::{NewStory, Story};
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

struct Inner {
    stories: BTreeMap<i32, Story>,
    last_id: i32,
}

/// Process-local store. Ids are monotonic and never handed out twice.
#[derive(Clone)]
pub struct InMemoryStoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryStoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                stories: BTreeMap::new(),
                last_id: 0,
            })),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().map(|inner| inner.stories.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| Error::StorageUnavailable("story store lock poisoned".to_string()))
    }
}

impl Default for InMemoryStoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoryStore for InMemoryStoryStore {
    async fn list_all(&self) -> Result<Vec<Story>> {
        Ok(self.lock()?.stories.values().cloned().collect())
    }

    async fn save(&self, story: NewStory) -> Result<Story> {
        let mut inner = self.lock()?;
        let id = inner
            .last_id
            .checked_add(1)
            .ok_or_else(|| Error::StorageUnavailable("story id space exhausted".to_string()))?;
        inner.last_id = id;

        let story = story.into_story(id);
        inner.stories.insert(id, story.clone());
        Ok(story)
    }

    async fn delete(&self, id: i32) -> Result<()> {
        self.lock()?
            .stories
            .remove(&id)
            .map(|_| ())
            .ok_or(Error::NotFound)
    }
}
