use super::StoryStore;
use crate::models::{NewStory, Story};
use crate::{Error, Result};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Stories in PostgreSQL. Ids come from a `SERIAL` sequence, so they are never reused.
#[derive(Clone)]
pub struct PgStoryStore {
    pool: PgPool,
}

impl PgStoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect, then bring the schema up to date.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        tracing::info!("Database connection pool created");

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl StoryStore for PgStoryStore {
    async fn list_all(&self) -> Result<Vec<Story>> {
        let stories = sqlx::query_as::<_, Story>(
            r#"SELECT id, name, "character", topic, story, image_url FROM stories ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(stories)
    }

    async fn save(&self, story: NewStory) -> Result<Story> {
        let saved = sqlx::query_as::<_, Story>(
            r#"INSERT INTO stories (name, "character", topic, story, image_url)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, name, "character", topic, story, image_url"#,
        )
        .bind(&story.name)
        .bind(&story.character)
        .bind(&story.topic)
        .bind(&story.story)
        .bind(&story.image_url)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Inserted story {}", saved.id);
        Ok(saved)
    }

    async fn delete(&self, id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM stories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }
}
