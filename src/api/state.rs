use std::sync::Arc;

use crate::generator::StoryGenerator;
use crate::models::GenerationOptions;
use crate::store::StoryStore;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheap to clone: everything heavy is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<StoryGenerator>,
    pub store: Arc<dyn StoryStore>,
    /// Stages `POST /generate-story` runs.
    pub generation: GenerationOptions,
}
