//! Chat provider contract and the always-available placeholder.

use async_trait::async_trait;

use crate::config::{NarratorConfig, ProviderKind};
use crate::error::NarratorError;
use crate::message::ChatMessage;
use crate::openai::OpenAiProvider;
use crate::LOG_NARRATOR;

pub const PLACEHOLDER_REPLY: &str = "(AI features are coming soon, stay tuned!)";

/// Contract every text-generation backend must satisfy.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    fn name(&self) -> &str;

    /// Whether the backend is configured well enough to try a request.
    fn is_available(&self) -> bool;

    /// Send a conversation and return the assistant's reply.
    ///
    /// # Errors
    ///
    /// Implementations fail on missing credentials, transport errors and
    /// non-success responses.
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, NarratorError>;
}

/// Stand-in used when no backend is configured. Never errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderProvider;

#[async_trait]
impl ChatProvider for PlaceholderProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::None
    }

    fn name(&self) -> &str {
        "Placeholder"
    }

    fn is_available(&self) -> bool {
        false
    }

    async fn chat(&self, _messages: &[ChatMessage]) -> Result<String, NarratorError> {
        Ok(PLACEHOLDER_REPLY.to_string())
    }
}

/// Build the provider named by `config`, falling back to the placeholder when
/// the configuration cannot support a live backend.
#[must_use]
pub fn create_provider(config: &NarratorConfig) -> Box<dyn ChatProvider> {
    match config.provider {
        ProviderKind::None => Box::new(PlaceholderProvider),
        ProviderKind::OpenAi if !config.has_api_key() => {
            log::warn!(
                target: LOG_NARRATOR,
                "no API key configured for {}; using placeholder replies",
                config.provider
            );
            Box::new(PlaceholderProvider)
        }
        ProviderKind::OpenAi => match OpenAiProvider::new(config.clone()) {
            Ok(provider) => Box::new(provider),
            Err(err) => {
                log::warn!(target: LOG_NARRATOR, "{err}; using placeholder replies");
                Box::new(PlaceholderProvider)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn placeholder_always_answers() {
        let provider = PlaceholderProvider;
        assert!(!provider.is_available());
        let reply = provider.chat(&[ChatMessage::user("hello")]).await.unwrap();
        assert_eq!(reply, PLACEHOLDER_REPLY);
    }

    #[test]
    fn factory_falls_back_without_a_key() {
        let provider = create_provider(&NarratorConfig::default());
        assert_eq!(provider.kind(), ProviderKind::None);

        let config = NarratorConfig {
            provider: ProviderKind::OpenAi,
            ..NarratorConfig::default()
        };
        assert_eq!(create_provider(&config).kind(), ProviderKind::None);

        let live = create_provider(&NarratorConfig::openai("sk-test"));
        assert_eq!(live.kind(), ProviderKind::OpenAi);
        assert!(live.is_available());
    }
}
