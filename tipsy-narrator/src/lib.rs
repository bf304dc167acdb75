//! Tipsy Narrator
//!
//! Optional text-generation collaborator for the Tipsy simulator. The game
//! never depends on a live model: with no configuration every request is
//! answered by a placeholder, and provider failures surface as a non-fatal
//! message instead of an error.

pub mod config;
pub mod error;
pub mod message;
pub mod narrator;
pub mod openai;
pub mod prompts;
pub mod provider;

pub const LOG_NARRATOR: &str = "tipsy::narrator";

pub use config::{NarratorConfig, ProviderKind};
pub use error::{ConfigError, NarratorError};
pub use message::{ChatMessage, Role};
pub use narrator::{FALLBACK_REPLY, Narration, Narrator, OrganChatTrigger, OrganDialog, OrganLine};
pub use openai::OpenAiProvider;
pub use prompts::{PromptParams, PromptTemplate};
pub use provider::{ChatProvider, PLACEHOLDER_REPLY, PlaceholderProvider, create_provider};
