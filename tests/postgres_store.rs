//! PostgreSQL-backed store tests. Run with a reachable `DATABASE_URL` and
//! `cargo test -- --ignored`.

use sqlx::PgPool;
use story_generator::models::NewStory;
use story_generator::store::{PgStoryStore, StoryStore};
use story_generator::Error;

fn new_story(name: &str) -> NewStory {
    NewStory {
        name: name.to_string(),
        character: "fox".to_string(),
        topic: "the forest".to_string(),
        story: "A fox found a lantern.".to_string(),
        image_url: String::new(),
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn save_then_list(pool: PgPool) {
    let store = PgStoryStore::new(pool);

    let saved = store.save(new_story("Rusty")).await.unwrap();
    let all = store.list_all().await.unwrap();

    assert_eq!(all, vec![saved]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn delete_twice_reports_not_found(pool: PgPool) {
    let store = PgStoryStore::new(pool);
    let saved = store.save(new_story("Rusty")).await.unwrap();

    store.delete(saved.id).await.unwrap();
    assert!(store.list_all().await.unwrap().is_empty());
    assert!(matches!(store.delete(saved.id).await, Err(Error::NotFound)));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn ids_are_not_reused(pool: PgPool) {
    let store = PgStoryStore::new(pool);
    let first = store.save(new_story("a")).await.unwrap();
    store.delete(first.id).await.unwrap();

    let second = store.save(new_story("b")).await.unwrap();
    assert!(second.id > first.id);
}
