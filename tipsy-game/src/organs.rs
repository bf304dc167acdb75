//! Organ status derived from a BAC reading.
//!
//! Each organ carries its own ascending threshold vector. A reading maps to
//! the tier of the first threshold strictly above it; readings at or past the
//! last threshold are [`OrganStatus::Critical`]. Flavor text is looked up from
//! the bundled organ content and resolves to empty strings when missing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

use crate::constants::{
    BRAIN_THRESHOLDS, HEART_THRESHOLDS, KIDNEY_THRESHOLDS, LIVER_THRESHOLDS, ORGAN_HEALTH_TABLE,
    STOMACH_THRESHOLDS,
};

const DEFAULT_ORGAN_DATA: &str = include_str!("../assets/data/organs.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Organ {
    Brain,
    Liver,
    Stomach,
    Heart,
    Kidney,
}

impl Organ {
    /// Canonical presentation order.
    pub const ALL: [Self; 5] = [
        Self::Brain,
        Self::Liver,
        Self::Stomach,
        Self::Heart,
        Self::Kidney,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Brain => "brain",
            Self::Liver => "liver",
            Self::Stomach => "stomach",
            Self::Heart => "heart",
            Self::Kidney => "kidney",
        }
    }

    #[must_use]
    pub const fn thresholds(self) -> [f64; 4] {
        match self {
            Self::Brain => BRAIN_THRESHOLDS,
            Self::Liver => LIVER_THRESHOLDS,
            Self::Stomach => STOMACH_THRESHOLDS,
            Self::Heart => HEART_THRESHOLDS,
            Self::Kidney => KIDNEY_THRESHOLDS,
        }
    }
}

impl fmt::Display for Organ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown organ `{0}`")]
pub struct UnknownOrgan(pub String);

impl FromStr for Organ {
    type Err = UnknownOrgan;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|organ| organ.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownOrgan(s.to_string()))
    }
}

/// Severity tier, mildest first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum OrganStatus {
    #[default]
    Normal,
    Mild,
    Moderate,
    Severe,
    Critical,
}

impl OrganStatus {
    pub const ALL: [Self; 5] = [
        Self::Normal,
        Self::Mild,
        Self::Moderate,
        Self::Severe,
        Self::Critical,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
            Self::Critical => "critical",
        }
    }

    #[must_use]
    pub const fn tier(self) -> usize {
        match self {
            Self::Normal => 0,
            Self::Mild => 1,
            Self::Moderate => 2,
            Self::Severe => 3,
            Self::Critical => 4,
        }
    }

    /// Health percentage for this tier, independent of organ.
    #[must_use]
    pub const fn health_percent(self) -> u8 {
        ORGAN_HEALTH_TABLE[self.tier()]
    }
}

impl fmt::Display for OrganStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganText {
    pub organ: Organ,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub quotes: BTreeMap<OrganStatus, String>,
    #[serde(default)]
    pub descriptions: BTreeMap<OrganStatus, String>,
}

/// Display content for every organ and tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OrganTextCatalog {
    #[serde(default)]
    pub organs: Vec<OrganText>,
}

impl OrganTextCatalog {
    #[must_use]
    pub fn load_from_static() -> Self {
        serde_json::from_str(DEFAULT_ORGAN_DATA).unwrap_or_default()
    }

    #[must_use]
    pub fn default_catalog() -> &'static Self {
        static CATALOG: OnceLock<OrganTextCatalog> = OnceLock::new();
        CATALOG.get_or_init(Self::load_from_static)
    }

    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into organ text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn text_for(&self, organ: Organ) -> Option<&OrganText> {
        self.organs.iter().find(|text| text.organ == organ)
    }

    /// Full state for one organ, resolving text from this catalog.
    #[must_use]
    pub fn state(&self, bac: f64, organ: Organ) -> OrganState {
        let status = organ_status(bac, organ);
        let text = self.text_for(organ);

        OrganState {
            organ,
            status,
            health_percent: status.health_percent(),
            icon: text.map(|t| t.icon.clone()).unwrap_or_default(),
            name: text.map(|t| t.name.clone()).unwrap_or_default(),
            quote: text
                .and_then(|t| t.quotes.get(&status))
                .cloned()
                .unwrap_or_default(),
            description: text
                .and_then(|t| t.descriptions.get(&status))
                .cloned()
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganState {
    pub organ: Organ,
    pub status: OrganStatus,
    pub health_percent: u8,
    pub icon: String,
    pub name: String,
    pub quote: String,
    pub description: String,
}

#[must_use]
pub fn organ_status(bac: f64, organ: Organ) -> OrganStatus {
    let thresholds = organ.thresholds();
    let tier = thresholds
        .iter()
        .position(|&limit| bac < limit)
        .unwrap_or(thresholds.len());
    OrganStatus::ALL[tier]
}

#[must_use]
pub fn organ_state(bac: f64, organ: Organ) -> OrganState {
    OrganTextCatalog::default_catalog().state(bac, organ)
}

/// All five organs in canonical order.
#[must_use]
pub fn all_organ_states(bac: f64) -> Vec<OrganState> {
    Organ::ALL
        .into_iter()
        .map(|organ| organ_state(bac, organ))
        .collect()
}
