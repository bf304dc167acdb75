//! Player character profile.
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::bac;
use crate::constants::{
    DEFAULT_AGE, DEFAULT_FEMALE_NAME, DEFAULT_MALE_NAME, DEFAULT_WEIGHT_KG, MAX_AGE, MAX_WEIGHT_KG,
    MIN_AGE, MIN_WEIGHT_KG,
};

/// Biological sex category used by the distribution and metabolism curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    #[default]
    Male,
    Female,
}

impl Sex {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Self-rated tolerance. Recorded on the profile, not used by the formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Tolerance {
    Low,
    #[default]
    Medium,
    High,
}

impl Tolerance {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CharacterError {
    #[error("weight {weight_kg} kg is outside 30-150 kg")]
    WeightOutOfRange { weight_kg: f64 },
    #[error("age {age} is outside 18-80")]
    AgeOutOfRange { age: u32 },
}

/// Unvalidated character input, defaulting to the creation form's initial values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterProfile {
    pub name: String,
    pub sex: Sex,
    pub weight_kg: f64,
    pub age: u32,
    pub fasting: bool,
    pub tolerance: Tolerance,
}

impl Default for CharacterProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            sex: Sex::Male,
            weight_kg: DEFAULT_WEIGHT_KG,
            age: DEFAULT_AGE,
            fasting: false,
            tolerance: Tolerance::Medium,
        }
    }
}

/// A validated character. Immutable for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CharacterProfile")]
pub struct Character {
    name: String,
    sex: Sex,
    weight_kg: f64,
    age: u32,
    fasting: bool,
    tolerance: Tolerance,
}

impl Character {
    /// Validate a profile into a character.
    ///
    /// A blank name is replaced with the default name for the chosen sex.
    ///
    /// # Errors
    ///
    /// Returns an error if the weight or age is outside the supported range.
    pub fn new(profile: CharacterProfile) -> Result<Self, CharacterError> {
        let CharacterProfile {
            name,
            sex,
            weight_kg,
            age,
            fasting,
            tolerance,
        } = profile;

        if !(MIN_WEIGHT_KG..=MAX_WEIGHT_KG).contains(&weight_kg) {
            return Err(CharacterError::WeightOutOfRange { weight_kg });
        }
        if !(MIN_AGE..=MAX_AGE).contains(&age) {
            return Err(CharacterError::AgeOutOfRange { age });
        }

        let trimmed = name.trim();
        let name = if trimmed.is_empty() {
            default_name(sex).to_string()
        } else {
            trimmed.to_string()
        };

        Ok(Self {
            name,
            sex,
            weight_kg,
            age,
            fasting,
            tolerance,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn sex(&self) -> Sex {
        self.sex
    }

    #[must_use]
    pub const fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    #[must_use]
    pub const fn age(&self) -> u32 {
        self.age
    }

    #[must_use]
    pub const fn is_fasting(&self) -> bool {
        self.fasting
    }

    #[must_use]
    pub const fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// BAC after `elapsed_hours`, decaying at this character's own metabolism rate.
    #[must_use]
    pub fn bac_at(&self, total_grams: f64, elapsed_hours: f64) -> f64 {
        bac::bac_with_decay_age(
            total_grams,
            self.weight_kg,
            self.sex,
            self.fasting,
            elapsed_hours,
            self.age,
        )
    }

    /// Peak BAC for `total_grams` with no elapsed time.
    #[must_use]
    pub fn peak_bac(&self, total_grams: f64) -> f64 {
        bac::bac(total_grams, self.weight_kg, self.sex, self.fasting, 0.0)
    }

    #[must_use]
    pub fn time_to_sober(&self, current_bac: f64) -> f64 {
        bac::time_to_sober(current_bac, self.age, self.sex)
    }
}

impl TryFrom<CharacterProfile> for Character {
    type Error = CharacterError;

    fn try_from(profile: CharacterProfile) -> Result<Self, Self::Error> {
        Self::new(profile)
    }
}

#[must_use]
pub const fn default_name(sex: Sex) -> &'static str {
    match sex {
        Sex::Male => DEFAULT_MALE_NAME,
        Sex::Female => DEFAULT_FEMALE_NAME,
    }
}
