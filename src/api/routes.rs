use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::extract::{JsonBody, PathParam};
use super::{ApiResult, AppState};
use crate::models::{GenerationResult, NewStory, Story, StoryRequest};

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveStoryResponse {
    pub message: String,
    pub story_id: i32,
}

pub async fn home() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "AI Story Generator API is running!".to_string(),
    })
}

pub async fn list_stories(State(state): State<AppState>) -> ApiResult<Json<Vec<Story>>> {
    let stories = state.store.list_all().await?;
    tracing::debug!("Listing {} stories", stories.len());
    Ok(Json(stories))
}

pub async fn save_story(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<NewStory>,
) -> ApiResult<Json<SaveStoryResponse>> {
    let saved = state.store.save(payload).await?;
    tracing::info!("Saved story {}", saved.id);

    Ok(Json(SaveStoryResponse {
        message: "Story saved successfully".to_string(),
        story_id: saved.id,
    }))
}

pub async fn delete_story(
    State(state): State<AppState>,
    PathParam(story_id): PathParam<i32>,
) -> ApiResult<Json<MessageResponse>> {
    state.store.delete(story_id).await?;
    tracing::info!("Deleted story {}", story_id);

    Ok(Json(MessageResponse {
        message: "Story deleted successfully".to_string(),
    }))
}

pub async fn generate_story(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<StoryRequest>,
) -> ApiResult<Json<GenerationResult>> {
    let result = state.generator.generate(&request, state.generation).await?;
    Ok(Json(result))
}
