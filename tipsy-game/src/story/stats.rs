use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{STORY_INITIAL_ENERGY, STORY_INITIAL_MONEY};

/// Mutable stat vector threaded through story traversal.
///
/// Money and energy are allowed to go negative; nothing clamps them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryStats {
    pub bac: f64,
    pub money: i32,
    pub energy: i32,
    pub social: i32,
    #[serde(default)]
    pub inventory: Vec<String>,
}

impl Default for StoryStats {
    fn default() -> Self {
        Self::initial()
    }
}

impl StoryStats {
    #[must_use]
    pub const fn initial() -> Self {
        Self {
            bac: 0.0,
            money: STORY_INITIAL_MONEY,
            energy: STORY_INITIAL_ENERGY,
            social: 0,
            inventory: Vec::new(),
        }
    }

    /// Shallow merge: fields present in `patch` overwrite, the rest stay.
    pub fn merge(&mut self, patch: StatsPatch) {
        if let Some(bac) = patch.bac {
            self.bac = bac;
        }
        if let Some(money) = patch.money {
            self.money = money;
        }
        if let Some(energy) = patch.energy {
            self.energy = energy;
        }
        if let Some(social) = patch.social {
            self.social = social;
        }
        if let Some(inventory) = patch.inventory {
            self.inventory = inventory;
        }
    }

    #[must_use]
    pub fn merged(&self, patch: StatsPatch) -> Self {
        let mut next = self.clone();
        next.merge(patch);
        next
    }

    #[must_use]
    pub fn value(&self, stat: Stat) -> f64 {
        match stat {
            Stat::Bac => self.bac,
            Stat::Money => f64::from(self.money),
            Stat::Energy => f64::from(self.energy),
            Stat::Social => f64::from(self.social),
        }
    }

    #[must_use]
    pub fn has_item(&self, item: &str) -> bool {
        self.inventory.iter().any(|held| held == item)
    }
}

/// Scalar stats addressable by guards and effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Bac,
    Money,
    Energy,
    Social,
}

impl Stat {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Bac => "bac",
            Self::Money => "money",
            Self::Energy => "energy",
            Self::Social => "social",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Partial update produced by an effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StatsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bac: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub money: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory: Option<Vec<String>>,
}

impl StatsPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bac.is_none()
            && self.money.is_none()
            && self.energy.is_none()
            && self.social.is_none()
            && self.inventory.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_vector() {
        let stats = StoryStats::initial();
        assert!(stats.bac.abs() < f64::EPSILON);
        assert_eq!(stats.money, 500);
        assert_eq!(stats.energy, 100);
        assert_eq!(stats.social, 0);
        assert!(stats.inventory.is_empty());
        assert_eq!(stats, StoryStats::default());
    }

    #[test]
    fn merge_only_touches_present_fields() {
        let mut stats = StoryStats::initial();
        stats.merge(StatsPatch {
            money: Some(-20),
            social: Some(5),
            ..StatsPatch::default()
        });
        assert_eq!(stats.money, -20);
        assert_eq!(stats.social, 5);
        assert_eq!(stats.energy, 100);
        assert!(stats.bac.abs() < f64::EPSILON);
    }

    #[test]
    fn empty_patch_is_identity() {
        let stats = StoryStats::initial();
        assert!(StatsPatch::default().is_empty());
        assert_eq!(stats.merged(StatsPatch::default()), stats);
    }

    #[test]
    fn patch_serializes_sparse() {
        let patch = StatsPatch {
            energy: Some(70),
            ..StatsPatch::default()
        };
        assert_eq!(serde_json::to_string(&patch).unwrap(), r#"{"energy":70}"#);
    }
}
