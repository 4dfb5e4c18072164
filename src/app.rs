//! Application wiring: builds every collaborator from [`Config`] and serves HTTP.

use crate::ai::{ChatService, ImageGenerationService, OpenAiChatClient, OpenAiImageClient};
use crate::api::{build_router, AppState};
use crate::cdn::{CdnClient, CdnService};
use crate::generator::{GeneratorServices, RetryPolicy, StoryGenerator};
use crate::hosting::{CdnImageHost, ImageHostingService};
use crate::models::Config;
use crate::store::{InMemoryStoryStore, PgStoryStore, StoryStore};
use crate::{Error, Result};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};

pub struct App {
    state: AppState,
    addr: SocketAddr,
}

impl App {
    /// Build an app from already-constructed state, e.g. mocks in tests.
    pub fn with_state(state: AppState, addr: SocketAddr) -> Self {
        Self { state, addr }
    }

    /// Construct an app from configuration. Connects to the database (if any)
    /// and the CDN (if re-hosting is on) before returning.
    pub async fn new(config: Config) -> Result<Self> {
        // One connection pool shared by every outbound HTTP client.
        let mut http_builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            info!("Outbound request timeout: {}s", secs);
            http_builder = http_builder.timeout(Duration::from_secs(secs));
        }
        let http_client = http_builder.build()?;

        info!("Chat model: {}", config.chat_model);
        let chat: Box<dyn ChatService> = Box::new(
            OpenAiChatClient::new_with_client(
                config.openai_api_key.clone(),
                config.chat_model.clone(),
                http_client.clone(),
            )
            .with_base_url(config.openai_base_url.clone()),
        );

        info!("Image model: {}", config.image_model);
        let image_gen: Box<dyn ImageGenerationService> = Box::new(
            OpenAiImageClient::new_with_client(
                config.openai_api_key.clone(),
                config.image_model.clone(),
                http_client.clone(),
            )
            .with_base_url(config.openai_base_url.clone()),
        );

        let image_host = Self::build_image_host(&config, http_client).await?;
        let store = Self::build_store(&config).await?;

        let generator = StoryGenerator::new(GeneratorServices {
            chat,
            image_gen,
            image_host,
            store: store.clone(),
        })
        .with_retry_policy(RetryPolicy {
            max_retries: config.max_retries,
            interval: Duration::from_millis(config.retry_interval_ms),
        });

        info!(
            "Generation stages: image={}, rehost={}, persist={}",
            config.generation.with_image, config.generation.rehost_image, config.generation.persist
        );

        let addr: SocketAddr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|e| Error::Config(format!("Invalid HOST/PORT: {}", e)))?;

        Ok(Self::with_state(
            AppState {
                generator: Arc::new(generator),
                store,
                generation: config.generation,
            },
            addr,
        ))
    }

    async fn build_image_host(
        config: &Config,
        http_client: reqwest::Client,
    ) -> Result<Option<Box<dyn ImageHostingService>>> {
        if !(config.generation.with_image && config.generation.rehost_image) {
            info!("Re-hosting disabled; illustrations keep their provider URLs");
            return Ok(None);
        }
        if config.cdn_access_key_id.is_none() || config.cdn_secret_access_key.is_none() {
            info!("CDN credentials not set; illustrations will not be re-hosted");
            return Ok(None);
        }

        let client = CdnClient::from_config(config).await?;
        info!(
            "Re-hosting illustrations in bucket {} under {}/",
            client.bucket(),
            config.cdn_key_prefix
        );
        let cdn: Box<dyn CdnService> = Box::new(client);

        Ok(Some(Box::new(
            CdnImageHost::new(http_client, cdn).with_key_prefix(&config.cdn_key_prefix),
        )))
    }

    async fn build_store(config: &Config) -> Result<Arc<dyn StoryStore>> {
        match &config.database_url {
            Some(url) => Ok(Arc::new(PgStoryStore::connect(url).await?)),
            None => {
                warn!("DATABASE_URL not set; stories are kept in memory and lost on restart");
                Ok(Arc::new(InMemoryStoryStore::new()))
            }
        }
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Serve until Ctrl-C.
    pub async fn serve(self) -> Result<()> {
        let listener = TcpListener::bind(self.addr).await?;
        info!("Listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                info!("Shutdown signal received");
            })
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{MockChatClient, MockImageGenerationClient};
    use crate::models::GenerationOptions;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_router_is_built_from_state() {
        let store: Arc<dyn StoryStore> = Arc::new(InMemoryStoryStore::new());
        let generator = StoryGenerator::new(GeneratorServices {
            chat: Box::new(MockChatClient::new()),
            image_gen: Box::new(MockImageGenerationClient::new()),
            image_host: None,
            store: store.clone(),
        });
        let state = AppState {
            generator: Arc::new(generator),
            store,
            generation: GenerationOptions::text_only(),
        };

        let app = App::with_state(state, "127.0.0.1:0".parse().unwrap());
        let response = app
            .router()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_text_only_config_builds_without_cdn_or_database() {
        let config = Config::from_lookup(|key| match key {
            "OPENAI_API_KEY" => Some("sk-test".to_string()),
            "GENERATE_WITH_IMAGE" => Some("false".to_string()),
            "PORT" => Some("0".to_string()),
            _ => None,
        })
        .unwrap();

        let app = App::new(config).await.unwrap();
        let response = app
            .router()
            .oneshot(Request::builder().uri("/stories").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
