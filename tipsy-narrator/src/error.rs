use thiserror::Error;

/// Failure talking to a chat provider.
#[derive(Debug, Error)]
pub enum NarratorError {
    #[error("no API key is configured for the chat provider")]
    MissingApiKey,
    #[error("could not build HTTP client: {0}")]
    ClientBuild(String),
    #[error("chat request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("chat provider answered {status}: {message}")]
    Status { status: u16, message: String },
}

/// Invalid narrator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown AI provider `{0}` (expected `none` or `openai`)")]
    UnknownProvider(String),
    #[error("invalid {key} value `{value}`")]
    InvalidValue { key: &'static str, value: String },
}
