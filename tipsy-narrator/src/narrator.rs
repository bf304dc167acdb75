//! Non-fatal façade over a [`ChatProvider`].
//!
//! Every call produces a [`Narration`]. Provider failures are logged and
//! turned into a short message the game can show in place of generated text.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use tipsy_game::{Character, Organ, organ_state};

use crate::LOG_NARRATOR;
use crate::config::NarratorConfig;
use crate::message::ChatMessage;
use crate::prompts::{PromptParams, PromptTemplate, params};
use crate::provider::{ChatProvider, create_provider};

pub const FALLBACK_REPLY: &str = "The AI had one too many and missed that...";
const ORGAN_DIALOG_LINES: usize = 3;
const ORGAN_CHAT_MIN_BAC: f64 = 0.02;
const ORGAN_CHAT_STEP: f64 = 0.03;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narration {
    pub template: PromptTemplate,
    pub text: String,
    /// Provider error shown to the player instead of generated text.
    pub error: Option<String>,
}

impl Narration {
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

/// One line of organ banter, e.g. `[Liver]: "Not again."`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganLine {
    pub speaker: Option<String>,
    pub text: String,
}

impl OrganLine {
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if let Some(caps) = organ_line_regex().and_then(|re| re.captures(line)) {
            return Self {
                speaker: Some(caps[1].trim().to_string()),
                text: caps[2].trim().to_string(),
            };
        }
        Self {
            speaker: None,
            text: line.to_string(),
        }
    }
}

fn organ_line_regex() -> Option<&'static Regex> {
    static ORGAN_LINE: OnceLock<Option<Regex>> = OnceLock::new();
    ORGAN_LINE
        .get_or_init(|| Regex::new(r#"^\[([^\]]+)\]\s*[:：]\s*["“]?(.*?)["”]?$"#).ok())
        .as_ref()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganDialog {
    pub lines: Vec<OrganLine>,
    pub error: Option<String>,
}

pub struct Narrator {
    provider: Box<dyn ChatProvider>,
}

impl Narrator {
    #[must_use]
    pub fn new(provider: Box<dyn ChatProvider>) -> Self {
        Self { provider }
    }

    #[must_use]
    pub fn from_config(config: &NarratorConfig) -> Self {
        Self::new(create_provider(config))
    }

    #[must_use]
    pub fn provider(&self) -> &dyn ChatProvider {
        self.provider.as_ref()
    }

    /// Render `template` and send it as a single user message.
    pub async fn generate(&self, template: PromptTemplate, params: &PromptParams) -> Narration {
        let prompt = template.render(params);
        log::debug!(
            target: LOG_NARRATOR,
            "{template} via {} ({} chars)",
            self.provider.name(),
            prompt.len()
        );
        match self.provider.chat(&[ChatMessage::user(prompt)]).await {
            Ok(text) => Narration {
                template,
                text,
                error: None,
            },
            Err(err) => {
                log::warn!(target: LOG_NARRATOR, "{template} failed: {err}");
                Narration {
                    template,
                    text: FALLBACK_REPLY.to_string(),
                    error: Some(err.to_string()),
                }
            }
        }
    }

    /// Rewrite `input` the way someone at `bac` would say it.
    pub async fn drunk_talk(&self, bac: f64, input: &str) -> Narration {
        let params = params([("bac", format_percent(bac)), ("input", input.to_string())]);
        self.generate(PromptTemplate::DrunkTalk, &params).await
    }

    /// Organ banter for `bac`, trimmed to the first few non-empty lines.
    pub async fn organ_dialog(&self, bac: f64) -> OrganDialog {
        let liver = organ_state(bac, Organ::Liver).health_percent;
        let brain = organ_state(bac, Organ::Brain).health_percent;
        let params = params([
            ("liverLoad", (100 - liver.min(100)).to_string()),
            ("brainClarity", brain.to_string()),
            ("bac", format!("{:.2}", bac * 100.0)),
        ]);
        let narration = self.generate(PromptTemplate::OrganDialog, &params).await;
        if narration.is_fallback() {
            return OrganDialog {
                lines: Vec::new(),
                error: narration.error,
            };
        }
        OrganDialog {
            lines: narration
                .text
                .lines()
                .filter(|line| !line.trim().is_empty())
                .take(ORGAN_DIALOG_LINES)
                .map(OrganLine::parse)
                .collect(),
            error: None,
        }
    }

    /// Personal advice after a session.
    pub async fn health_advice(
        &self,
        character: &Character,
        total_alcohol: f64,
        max_bac: f64,
    ) -> Narration {
        let params = params([
            ("age", character.age().to_string()),
            ("gender", character.sex().to_string()),
            ("weight", format!("{:.0}", character.weight_kg())),
            ("totalAlcohol", format!("{total_alcohol:.1}")),
            ("maxBac", format!("{:.2}", max_bac * 100.0)),
        ]);
        self.generate(PromptTemplate::HealthAdvice, &params).await
    }

    /// Continue a story scene after `choice`.
    pub async fn story_branch(&self, scene: &str, choice: &str, bac: f64) -> Narration {
        let params = params([
            ("scene", scene.to_string()),
            ("choice", choice.to_string()),
            ("bac", format_percent(bac)),
        ]);
        self.generate(PromptTemplate::StoryBranch, &params).await
    }
}

impl std::fmt::Debug for Narrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Narrator")
            .field("provider", &self.provider.name())
            .finish()
    }
}

fn format_percent(bac: f64) -> String {
    format!("{:.2}%", bac * 100.0)
}

/// Decides when the organ chat should speak up as BAC climbs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrganChatTrigger {
    last: Option<f64>,
}

impl OrganChatTrigger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires above 0.02 on the first reading, then after each rise of 0.03
    /// since the last time it fired.
    pub fn observe(&mut self, bac: f64) -> bool {
        if bac <= ORGAN_CHAT_MIN_BAC {
            return false;
        }
        let fire = self.last.is_none_or(|last| bac - last >= ORGAN_CHAT_STEP);
        if fire {
            self.last = Some(bac);
        }
        fire
    }

    #[must_use]
    pub fn last_fired_at(&self) -> Option<f64> {
        self.last
    }
}
