//! End-of-session verdict, health tips and summary.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::bac::{BacBand, SoberEta};
use crate::character::Character;
use crate::constants::{BUZZED_BAC, DRIVING_WARNING_BAC, DRUNK_BAC};
use crate::organs::OrganState;

/// Headline judgement of a session, keyed on peak BAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Responsible,
    JustTipsy,
    GettingBuzzed,
    TooMuch,
    Danger,
}

impl Verdict {
    #[must_use]
    pub fn for_max_bac(max_bac: f64) -> Self {
        match BacBand::classify(max_bac) {
            BacBand::Sober => Self::Responsible,
            BacBand::Tipsy => Self::JustTipsy,
            BacBand::Buzzed => Self::GettingBuzzed,
            BacBand::Drunk => Self::TooMuch,
            BacBand::Danger => Self::Danger,
        }
    }

    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Responsible => "🎉",
            Self::JustTipsy => "😊",
            Self::GettingBuzzed => "😵‍💫",
            Self::TooMuch => "🥴",
            Self::Danger => "🚨",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Responsible => "Responsible drinking!",
            Self::JustTipsy => "Just tipsy",
            Self::GettingBuzzed => "Getting buzzed",
            Self::TooMuch => "Too much!",
            Self::Danger => "Danger! Way too much!",
        }
    }

    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Responsible => "You kept your drinking under control. Your body thanks you!",
            Self::JustTipsy => "A little is fine, but remember: no driving.",
            Self::GettingBuzzed => "Your judgement and reaction time are already affected.",
            Self::TooMuch => {
                "You are past the legal drunk-driving limit and your organs are working overtime!"
            }
            Self::Danger => "This amount carries serious health risks. Please stay safe!",
        }
    }
}

/// Ordered advice list for the result screen.
#[must_use]
pub fn health_tips(max_bac: f64, character: &Character) -> Vec<String> {
    let mut tips = Vec::new();

    if max_bac >= DRIVING_WARNING_BAC {
        tips.push("🚗 Do not drive after drinking! A designated driver or a taxi is the safest choice.".to_string());
    }
    tips.push(
        "💧 Drink water! Alcohol dehydrates you; have a glass of water for every drink."
            .to_string(),
    );
    if character.is_fasting() {
        tips.push(
            "🍞 Eat something before you drink next time; on an empty stomach alcohol is absorbed 30% faster."
                .to_string(),
        );
    }
    if max_bac >= BUZZED_BAC {
        tips.push("😴 Get enough sleep; alcohol seriously disrupts sleep quality.".to_string());
        let eta = SoberEta::from_hours(character.time_to_sober(max_bac));
        tips.push(format!(
            "⏰ Estimated time until sober: {eta}. Avoid anything that needs focus until then."
        ));
    }
    if max_bac >= DRUNK_BAC {
        tips.push(
            "🏥 If you feel seriously unwell, see a doctor. Alcohol poisoning is no joke!"
                .to_string(),
        );
    }
    tips.push("💡 The WHO says there is no safe level of alcohol consumption.".to_string());

    tips
}

/// Everything the result screen shows for a finished drinking session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub verdict: Verdict,
    pub drinks_count: usize,
    pub total_alcohol: f64,
    pub max_bac: f64,
    pub current_bac: f64,
    /// Counted from the current BAC, not the peak.
    pub sober_eta: SoberEta,
    pub drink_counts: BTreeMap<String, u32>,
    /// Organ states at the peak BAC.
    pub organs: Vec<OrganState>,
    pub tips: Vec<String>,
    pub unlocked: Vec<String>,
}
