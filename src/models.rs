//! Data models and structures
//!
//! Defines the story record, the request/response bodies exchanged over HTTP,
//! and the process configuration loaded at start-up.

use serde::{Deserialize, Serialize};

/// A persisted story.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Story {
    pub id: i32,
    pub name: String,
    pub character: String,
    pub topic: String,
    pub story: String,
    pub image_url: String,
}

/// All fields of a story except the store-assigned id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewStory {
    pub name: String,
    pub character: String,
    pub topic: String,
    pub story: String,
    pub image_url: String,
}

impl NewStory {
    pub fn into_story(self, id: i32) -> Story {
        Story {
            id,
            name: self.name,
            character: self.character,
            topic: self.topic,
            story: self.story,
            image_url: self.image_url,
        }
    }
}

/// Caller-supplied prompt fields for a generation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoryRequest {
    pub name: String,
    pub character: String,
    pub topic: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationResult {
    pub story: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Which optional stages of the generation chain run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationOptions {
    pub with_image: bool,
    pub rehost_image: bool,
    pub persist: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            with_image: true,
            rehost_image: true,
            persist: true,
        }
    }
}

impl GenerationOptions {
    pub fn text_only() -> Self {
        Self {
            with_image: false,
            rehost_image: false,
            persist: false,
        }
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub chat_model: String,
    pub image_model: String,
    pub database_url: Option<String>,
    pub cdn_access_key_id: Option<String>,
    pub cdn_secret_access_key: Option<String>,
    pub cdn_endpoint: String,
    pub cdn_bucket: String,
    pub cdn_base_url: String,
    /// Folder inside the bucket that re-hosted illustrations land in.
    pub cdn_key_prefix: String,
    pub generation: GenerationOptions,
    pub max_retries: usize,
    pub retry_interval_ms: u64,
    /// Overall timeout for outbound HTTP calls. `None` leaves them unbounded.
    pub request_timeout_secs: Option<u64>,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup, so tests don't have to touch the process env.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let openai_api_key = var("OPENAI_API_KEY")
            .ok_or_else(|| crate::Error::Config("OPENAI_API_KEY not set".to_string()))?;

        let generation = GenerationOptions {
            with_image: parse_bool(&lookup, "GENERATE_WITH_IMAGE", true)?,
            rehost_image: parse_bool(&lookup, "GENERATE_REHOST_IMAGE", true)?,
            persist: parse_bool(&lookup, "GENERATE_PERSIST", true)?,
        };

        let cdn_access_key_id = var("CDN_ACCESS_KEY_ID");
        let cdn_secret_access_key = var("CDN_SECRET_ACCESS_KEY");
        if generation.with_image && generation.rehost_image {
            if cdn_access_key_id.is_none() {
                return Err(crate::Error::Config(
                    "CDN_ACCESS_KEY_ID not set (required when GENERATE_REHOST_IMAGE is on)"
                        .to_string(),
                ));
            }
            if cdn_secret_access_key.is_none() {
                return Err(crate::Error::Config(
                    "CDN_SECRET_ACCESS_KEY not set (required when GENERATE_REHOST_IMAGE is on)"
                        .to_string(),
                ));
            }
        }

        Ok(Self {
            openai_api_key,
            openai_base_url: var("OPENAI_BASE_URL")
                .unwrap_or_else(|| "https://api.openai.com".to_string()),
            chat_model: var("CHAT_MODEL").unwrap_or_else(|| "gpt-3.5-turbo".to_string()),
            image_model: var("IMAGE_MODEL").unwrap_or_else(|| "dall-e-3".to_string()),
            database_url: var("DATABASE_URL"),
            cdn_access_key_id,
            cdn_secret_access_key,
            cdn_endpoint: var("CDN_ENDPOINT")
                .unwrap_or_else(|| "https://nyc3.digitaloceanspaces.com".to_string()),
            cdn_bucket: var("CDN_BUCKET").unwrap_or_else(|| "story-generator".to_string()),
            cdn_base_url: var("CDN_BASE_URL")
                .unwrap_or_else(|| "https://cdn.example.com".to_string()),
            cdn_key_prefix: var("CDN_KEY_PREFIX").unwrap_or_else(|| "stories".to_string()),
            generation,
            max_retries: parse_num(&lookup, "MAX_RETRIES", 0)?,
            retry_interval_ms: parse_num(&lookup, "RETRY_INTERVAL_MS", 2000)?,
            request_timeout_secs: var("REQUEST_TIMEOUT_SECS")
                .map(|_| parse_num(&lookup, "REQUEST_TIMEOUT_SECS", 0))
                .transpose()?,
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_num(&lookup, "PORT", 8000)?,
        })
    }
}

fn parse_bool<F>(lookup: &F, key: &str, default: bool) -> crate::Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) if v.is_empty() => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(crate::Error::Config(format!(
                "{} must be a boolean, got '{}'",
                key, v
            ))),
        },
    }
}

fn parse_num<F, T>(lookup: &F, key: &str, default: T) -> crate::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(v) if !v.trim().is_empty() => v
            .trim()
            .parse()
            .map_err(|_| crate::Error::Config(format!("{} must be a number, got '{}'", key, v))),
        _ => Ok(default),
    }
}
