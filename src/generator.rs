//! Story generation: text, then illustration, then re-hosting, then persistence.

use crate::ai::{ChatService, ImageGenerationService};
use crate::hosting::ImageHostingService;
use crate::models::{GenerationOptions, GenerationResult, NewStory, StoryRequest};
use crate::store::StoryStore;
use crate::{prompts, Error, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::{strategy::FixedInterval, Retry};
use tracing::{error, info, warn};

pub const MAX_STORY_TOKENS: u32 = 500;

/// How often a failed external call is retried. The default is a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: usize,
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            interval: Duration::from_millis(2000),
        }
    }
}

/// Injectable service bundle used to construct [`StoryGenerator`].
pub struct GeneratorServices {
    pub chat: Box<dyn ChatService>,
    pub image_gen: Box<dyn ImageGenerationService>,
    /// `None` when no hosting service is configured; re-hosting then fails.
    pub image_host: Option<Box<dyn ImageHostingService>>,
    pub store: Arc<dyn StoryStore>,
}

pub struct StoryGenerator {
    chat: Box<dyn ChatService>,
    image_gen: Box<dyn ImageGenerationService>,
    image_host: Option<Box<dyn ImageHostingService>>,
    store: Arc<dyn StoryStore>,
    retry: RetryPolicy,
}

impl StoryGenerator {
    pub fn new(services: GeneratorServices) -> Self {
        Self {
            chat: services.chat,
            image_gen: services.image_gen,
            image_host: services.image_host,
            store: services.store,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Run the whole chain. Any failure comes back as [`Error::GenerationFailed`]
    /// and nothing is persisted.
    pub async fn generate(
        &self,
        request: &StoryRequest,
        options: GenerationOptions,
    ) -> Result<GenerationResult> {
        info!(
            "Generating story for {} the {} about {}",
            request.name, request.character, request.topic
        );

        self.run(request, options).await.map_err(|e| {
            error!("Story generation failed: {}", e);
            e.into_generation_failure()
        })
    }

    async fn run(
        &self,
        request: &StoryRequest,
        options: GenerationOptions,
    ) -> Result<GenerationResult> {
        let prompt = prompts::story_prompt(&request.name, &request.character, &request.topic);
        let system = prompts::STORY_SYSTEM.trim();

        let story = self
            .with_retry("story text", || {
                self.chat.complete(system, &prompt, MAX_STORY_TOKENS)
            })
            .await?
            .trim()
            .to_string();
        info!("Story text generated ({} chars)", story.len());

        let image_url = if options.with_image {
            Some(self.illustrate(request, options.rehost_image).await?)
        } else {
            None
        };

        if options.persist {
            let saved = self
                .store
                .save(NewStory {
                    name: request.name.clone(),
                    character: request.character.clone(),
                    topic: request.topic.clone(),
                    story: story.clone(),
                    image_url: image_url.clone().unwrap_or_default(),
                })
                .await?;
            info!("Saved generated story as {}", saved.id);
        }

        Ok(GenerationResult { story, image_url })
    }

    async fn illustrate(&self, request: &StoryRequest, rehost: bool) -> Result<String> {
        let prompt = prompts::illustration_prompt(&request.character, &request.topic);

        let source_url = self
            .with_retry("illustration", || self.image_gen.generate_image(&prompt))
            .await?;
        info!("Illustration generated");

        if !rehost {
            return Ok(source_url);
        }

        let host = self
            .image_host
            .as_ref()
            .ok_or_else(|| Error::Config("image hosting is not configured".to_string()))?;

        let permanent_url = self
            .with_retry("image re-host", || host.rehost(&source_url))
            .await?;
        info!("Illustration re-hosted at {}", permanent_url);
        Ok(permanent_url)
    }

    async fn with_retry<T, F, Fut>(&self, step: &str, mut action: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let strategy = FixedInterval::new(self.retry.interval).take(self.retry.max_retries);

        Retry::spawn(strategy, || {
            let attempt = action();
            async move {
                attempt.await.map_err(|e| {
                    warn!("[{}] attempt failed: {}", step, e);
                    e
                })
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{MockChatClient, MockImageGenerationClient};
    use crate::hosting::MockImageHost;
    use crate::store::{InMemoryStoryStore, MockStoryStore};
    use pretty_assertions::assert_eq;

    struct Harness {
        chat: MockChatClient,
        image_gen: MockImageGenerationClient,
        image_host: MockImageHost,
        store: InMemoryStoryStore,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                chat: MockChatClient::new(),
                image_gen: MockImageGenerationClient::new(),
                image_host: MockImageHost::new(),
                store: InMemoryStoryStore::new(),
            }
        }

        fn generator(&self) -> StoryGenerator {
            StoryGenerator::new(GeneratorServices {
                chat: Box::new(self.chat.clone()),
                image_gen: Box::new(self.image_gen.clone()),
                image_host: Some(Box::new(self.image_host.clone())),
                store: Arc::new(self.store.clone()),
            })
        }
    }

    fn lily() -> StoryRequest {
        StoryRequest {
            name: "Lily".to_string(),
            character: "unicorn".to_string(),
            topic: "space".to_string(),
        }
    }

    #[tokio::test]
    async fn test_text_prompt_sent_to_chat_service() {
        let harness = Harness::new();
        harness
            .generator()
            .generate(&lily(), GenerationOptions::text_only())
            .await
            .unwrap();

        let calls = harness.chat.get_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].prompt,
            "Write a short children's story about space starring a unicorn named Lily."
        );
        assert_eq!(
            calls[0].system,
            "You are a creative assistant that writes engaging children's stories."
        );
        assert_eq!(calls[0].max_tokens, 500);
    }

    #[tokio::test]
    async fn test_text_only_trims_and_skips_image() {
        let mut harness = Harness::new();
        harness.chat = MockChatClient::new().with_response("\n  Lily flew.  \n".to_string());

        let result = harness
            .generator()
            .generate(&lily(), GenerationOptions::text_only())
            .await
            .unwrap();

        assert_eq!(
            result,
            GenerationResult {
                story: "Lily flew.".to_string(),
                image_url: None,
            }
        );
        assert_eq!(harness.image_gen.get_call_count(), 0);
        assert!(harness.store.is_empty());
    }

    #[tokio::test]
    async fn test_image_without_rehost_returns_source_url() {
        let mut harness = Harness::new();
        harness.image_gen = MockImageGenerationClient::new()
            .with_url_response("https://tmp.example.com/a.png".to_string());

        let options = GenerationOptions {
            with_image: true,
            rehost_image: false,
            persist: false,
        };
        let result = harness.generator().generate(&lily(), options).await.unwrap();

        assert_eq!(result.image_url.as_deref(), Some("https://tmp.example.com/a.png"));
        assert_eq!(
            harness.image_gen.get_prompts(),
            vec!["A cute and colorful illustration of a unicorn in a space setting, in a children's book style."]
        );
        assert!(harness.image_host.get_sources().is_empty());
    }

    #[tokio::test]
    async fn test_persisted_url_is_permanent_not_ephemeral() {
        let mut harness = Harness::new();
        harness.image_gen = MockImageGenerationClient::new()
            .with_url_response("https://tmp.example.com/a.png".to_string());
        harness.image_host =
            MockImageHost::new().with_base_url("https://cdn.example.com/stories".to_string());

        let result = harness
            .generator()
            .generate(&lily(), GenerationOptions::default())
            .await
            .unwrap();

        assert_eq!(
            result.image_url.as_deref(),
            Some("https://cdn.example.com/stories/1.png")
        );
        assert_eq!(
            harness.image_host.get_sources(),
            vec!["https://tmp.example.com/a.png"]
        );

        let stored = harness.store.list_all().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].image_url, "https://cdn.example.com/stories/1.png");
        assert_eq!(stored[0].story, result.story);
    }

    #[tokio::test]
    async fn test_image_failure_persists_nothing() {
        let mut harness = Harness::new();
        harness.image_gen = MockImageGenerationClient::new().failing("content policy violation");

        let err = harness
            .generator()
            .generate(&lily(), GenerationOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::GenerationFailed(_)));
        assert!(err.to_string().contains("content policy violation"));
        assert!(harness.store.is_empty());
        assert!(harness.image_host.get_sources().is_empty());
    }

    #[tokio::test]
    async fn test_rehost_failure_persists_nothing() {
        let mut harness = Harness::new();
        harness.image_host = MockImageHost::new().failing("upload denied");

        let err = harness
            .generator()
            .generate(&lily(), GenerationOptions::default())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("upload denied"));
        assert!(harness.store.is_empty());
    }

    #[tokio::test]
    async fn test_text_failure_skips_image() {
        let mut harness = Harness::new();
        harness.chat = MockChatClient::new().failing("invalid api key");

        let err = harness
            .generator()
            .generate(&lily(), GenerationOptions::default())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "AI provider error: invalid api key");
        assert_eq!(harness.image_gen.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_rehost_without_host_fails() {
        let harness = Harness::new();
        let generator = StoryGenerator::new(GeneratorServices {
            chat: Box::new(harness.chat.clone()),
            image_gen: Box::new(harness.image_gen.clone()),
            image_host: None,
            store: Arc::new(harness.store.clone()),
        });

        let err = generator
            .generate(&lily(), GenerationOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::GenerationFailed(_)));
        assert!(err.to_string().contains("image hosting is not configured"));
        assert!(harness.store.is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure_becomes_generation_failure() {
        let harness = Harness::new();
        let store = MockStoryStore::new().failing("db down");
        let generator = StoryGenerator::new(GeneratorServices {
            chat: Box::new(harness.chat.clone()),
            image_gen: Box::new(harness.image_gen.clone()),
            image_host: Some(Box::new(harness.image_host.clone())),
            store: Arc::new(store.clone()),
        });

        let err = generator
            .generate(&lily(), GenerationOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::GenerationFailed(_)));
        assert_eq!(err.to_string(), "Storage unavailable: db down");
        assert_eq!(store.get_call_count(), 1);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_no_retry_by_default() {
        let mut harness = Harness::new();
        harness.chat = MockChatClient::new().failing("timeout");

        let _ = harness
            .generator()
            .generate(&lily(), GenerationOptions::text_only())
            .await;

        assert_eq!(harness.chat.get_call_count(), 1);
    }

    #[tokio::test]
    async fn test_configured_retries_are_attempted() {
        let mut harness = Harness::new();
        harness.image_gen = MockImageGenerationClient::new().failing("busy");

        let generator = harness.generator().with_retry_policy(RetryPolicy {
            max_retries: 2,
            interval: Duration::from_millis(1),
        });

        let options = GenerationOptions {
            with_image: true,
            rehost_image: false,
            persist: true,
        };
        let err = generator.generate(&lily(), options).await.unwrap_err();

        assert!(err.to_string().contains("busy"));
        assert_eq!(harness.image_gen.get_call_count(), 3);
        assert_eq!(harness.chat.get_call_count(), 1);
        assert!(harness.store.is_empty());
    }
}
