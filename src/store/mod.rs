//! Story persistence
//!
//! A single flat table of generated stories. Records are created and deleted,
//! never updated.

pub mod memory;
pub mod mock;
pub mod postgres;

pub use memory::InMemoryStoryStore;
pub use mock::MockStoryStore;
pub use postgres::PgStoryStore;

use crate::models::{NewStory, Story};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait StoryStore: Send + Sync {
    /// Every stored story, oldest first.
    async fn list_all(&self) -> Result<Vec<Story>>;

    /// Persist a new story and return it with its freshly assigned id.
    async fn save(&self, story: NewStory) -> Result<Story>;

    /// Remove the story with `id`, or fail with [`crate::Error::NotFound`].
    async fn delete(&self, id: i32) -> Result<()>;
}
