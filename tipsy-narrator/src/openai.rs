//! OpenAI-compatible chat completions backend.
//!
//! Any service that speaks `POST {base}/chat/completions` with bearer auth
//! works here (OpenAI, DeepSeek, Moonshot, a local gateway).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::LOG_NARRATOR;
use crate::config::{NarratorConfig, ProviderKind};
use crate::error::NarratorError;
use crate::message::ChatMessage;
use crate::provider::ChatProvider;

#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    http: Client,
    config: NarratorConfig,
}

impl OpenAiProvider {
    /// # Errors
    ///
    /// Returns [`NarratorError::ClientBuild`] when the HTTP client cannot be
    /// constructed.
    pub fn new(config: NarratorConfig) -> Result<Self, NarratorError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| NarratorError::ClientBuild(err.to_string()))?;
        Ok(Self { http, config })
    }

    #[must_use]
    pub fn config(&self) -> &NarratorConfig {
        &self.config
    }
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn name(&self) -> &str {
        "OpenAI Compatible"
    }

    fn is_available(&self) -> bool {
        self.config.has_api_key()
    }

    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, NarratorError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(NarratorError::MissingApiKey)?;

        let payload = ChatCompletionRequest {
            model: self.config.model.as_str(),
            messages,
            temperature: self.config.temperature,
        };

        let url = self.config.chat_url();
        log::debug!(target: LOG_NARRATOR, "POST {url} ({} messages)", messages.len());
        let response = self
            .http
            .post(url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<OpenAiErrorResponse>().await {
                Ok(body) => body.error.message,
                Err(_) => status.canonical_reason().unwrap_or_default().to_string(),
            };
            return Err(NarratorError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let provider = OpenAiProvider::new(NarratorConfig {
            provider: ProviderKind::OpenAi,
            ..NarratorConfig::default()
        })
        .unwrap();
        assert!(!provider.is_available());
        let err = provider.chat(&[ChatMessage::user("hi")]).await.unwrap_err();
        assert!(matches!(err, NarratorError::MissingApiKey));
    }

    #[test]
    fn request_body_shape() {
        let messages = [ChatMessage::user("hi")];
        let body = serde_json::to_value(ChatCompletionRequest {
            model: "gpt-3.5-turbo",
            messages: &messages,
            temperature: 0.5,
        })
        .unwrap();
        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["temperature"], 0.5);
    }

    #[test]
    fn empty_choices_parse() {
        let parsed: ChatCompletionResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.choices.is_empty());
    }
}
