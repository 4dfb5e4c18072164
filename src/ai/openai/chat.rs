use super::client::OpenAiHttpClient;
use super::types::{ChatCompletionRequest, ChatMessage};
use crate::ai::ChatService;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;

pub struct OpenAiChatClient {
    http: OpenAiHttpClient,
    model: String,
}

impl OpenAiChatClient {
    pub fn new_with_client(api_key: String, model: String, client: Client) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(api_key, client),
            model,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }
}

#[async_trait]
impl ChatService for OpenAiChatClient {
    async fn complete(&self, system: &str, prompt: &str, max_tokens: u32) -> Result<String> {
        tracing::debug!("Sending chat completion request (model: {})", self.model);

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(prompt)],
            max_tokens,
        };

        let response = self.http.chat_completion(request).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::AiProvider("No response from OpenAI chat API".to_string()))?;

        if choice.finish_reason.as_deref() == Some("length") {
            tracing::warn!("Completion was cut off at {} tokens", max_tokens);
        }

        choice
            .message
            .content
            .ok_or_else(|| Error::AiProvider("OpenAI chat API returned no content".to_string()))
    }
}
