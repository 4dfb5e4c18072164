//! AI service integration for story text and illustration generation
//!
//! Defines the provider-agnostic traits the generator depends on, the OpenAI
//! implementations, and in-process mocks for tests.

pub mod mock;
pub mod openai;

pub use mock::{MockChatClient, MockImageGenerationClient};
pub use openai::{OpenAiChatClient, OpenAiImageClient};

use crate::Result;
use async_trait::async_trait;

/// Text completion: a system instruction plus one user prompt in, completion text out.
#[async_trait]
pub trait ChatService: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str, max_tokens: u32) -> Result<String>;
}

/// Image generation: a prompt in, the (possibly short-lived) URL of the generated image out.
#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> Result<String>;
}
