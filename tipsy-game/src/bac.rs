//! Blood alcohol concentration model.
//!
//! A single-compartment Widmark estimate with linear elimination. Every
//! function here is pure and total over non-negative inputs; out-of-range
//! inputs are not validated and simply flow through the arithmetic.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::character::Sex;
use crate::constants::{
    BASE_METABOLISM_RATE, BUZZED_BAC, DANGER_BAC, DISTRIBUTION_RATIO_FEMALE,
    DISTRIBUTION_RATIO_MALE, DRIVING_WARNING_BAC, DRUNK_BAC, ETHANOL_DENSITY_G_PER_ML,
    FASTING_MULTIPLIER, FEMALE_METABOLISM_FACTOR, LEGACY_DECAY_AGE, LEGAL_LIMIT_BAC,
    MINUTES_PER_HOUR, SENIOR_AGE_THRESHOLD, SENIOR_METABOLISM_FACTOR, SOBER_TIME_STEPS_PER_HOUR,
    TIPSY_BAC, WIDMARK_PERCENT_SCALE, YOUNG_AGE_THRESHOLD, YOUNG_METABOLISM_FACTOR,
};
use crate::numbers::{floor_f64_to_u32, round_bac, round_f64_to_u32};

/// Grams of ethanol in a drink of `volume_ml` at `strength_percent` ABV.
#[must_use]
pub fn alcohol_grams(volume_ml: f64, strength_percent: f64) -> f64 {
    volume_ml * (strength_percent / 100.0) * ETHANOL_DENSITY_G_PER_ML
}

#[must_use]
pub const fn distribution_ratio(sex: Sex) -> f64 {
    match sex {
        Sex::Male => DISTRIBUTION_RATIO_MALE,
        Sex::Female => DISTRIBUTION_RATIO_FEMALE,
    }
}

/// Estimated BAC in percent, rounded to four decimals and floored at zero.
///
/// Elimination over `elapsed_hours` uses the metabolism rate for age `0`,
/// which always selects the young-adult multiplier. Use
/// [`bac_with_decay_age`] (or [`crate::Character::bac_at`]) to decay at a
/// real age.
#[must_use]
pub fn bac(total_grams: f64, weight_kg: f64, sex: Sex, fasting: bool, elapsed_hours: f64) -> f64 {
    bac_with_decay_age(
        total_grams,
        weight_kg,
        sex,
        fasting,
        elapsed_hours,
        LEGACY_DECAY_AGE,
    )
}

#[must_use]
pub fn bac_with_decay_age(
    total_grams: f64,
    weight_kg: f64,
    sex: Sex,
    fasting: bool,
    elapsed_hours: f64,
    decay_age: u32,
) -> f64 {
    let mut peak = total_grams / (weight_kg * distribution_ratio(sex) * WIDMARK_PERCENT_SCALE);
    if fasting {
        peak *= FASTING_MULTIPLIER;
    }
    let metabolized = metabolism_rate(decay_age, sex) * elapsed_hours;
    round_bac((peak - metabolized).max(0.0))
}

/// Elimination rate in BAC percentage points per hour.
#[must_use]
pub fn metabolism_rate(age: u32, sex: Sex) -> f64 {
    let mut rate = BASE_METABOLISM_RATE;
    if age > SENIOR_AGE_THRESHOLD {
        rate *= SENIOR_METABOLISM_FACTOR;
    } else if age < YOUNG_AGE_THRESHOLD {
        rate *= YOUNG_METABOLISM_FACTOR;
    }
    if sex == Sex::Female {
        rate *= FEMALE_METABOLISM_FACTOR;
    }
    rate
}

/// Hours until `current_bac` is fully eliminated, rounded up to a tenth of an hour.
#[must_use]
pub fn time_to_sober(current_bac: f64, age: u32, sex: Sex) -> f64 {
    if current_bac <= 0.0 {
        return 0.0;
    }
    let rate = metabolism_rate(age, sex);
    ((current_bac / rate) * SOBER_TIME_STEPS_PER_HOUR).ceil() / SOBER_TIME_STEPS_PER_HOUR
}

/// Hours and minutes until sober.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SoberEta {
    Sober,
    In { hours: u32, minutes: u32 },
}

impl SoberEta {
    #[must_use]
    pub fn from_hours(hours: f64) -> Self {
        if hours.is_nan() || hours <= 0.0 {
            return Self::Sober;
        }
        let whole = hours.floor();
        Self::In {
            hours: floor_f64_to_u32(whole),
            minutes: round_f64_to_u32((hours - whole) * MINUTES_PER_HOUR),
        }
    }
}

impl fmt::Display for SoberEta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Sober => f.write_str("sober"),
            Self::In { hours: 0, minutes } => write!(f, "{minutes} min"),
            Self::In { hours, minutes: 0 } => write!(f, "{hours} h"),
            Self::In { hours, minutes } => write!(f, "{hours} h {minutes} min"),
        }
    }
}

#[must_use]
pub fn format_sober_time(hours: f64) -> String {
    SoberEta::from_hours(hours).to_string()
}

/// Coarse intoxication band used for live feedback and verdicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BacBand {
    Sober,
    Tipsy,
    Buzzed,
    Drunk,
    Danger,
}

impl BacBand {
    #[must_use]
    pub fn classify(bac: f64) -> Self {
        if bac < TIPSY_BAC {
            Self::Sober
        } else if bac < BUZZED_BAC {
            Self::Tipsy
        } else if bac < DRUNK_BAC {
            Self::Buzzed
        } else if bac < DANGER_BAC {
            Self::Drunk
        } else {
            Self::Danger
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sober => "Sober",
            Self::Tipsy => "Tipsy",
            Self::Buzzed => "Mildly drunk",
            Self::Drunk => "Heavily drunk ⚠️",
            Self::Danger => "Danger",
        }
    }

    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Sober => "😊",
            Self::Tipsy => "😄",
            Self::Buzzed => "😵‍💫",
            Self::Drunk => "🥴",
            Self::Danger => "🚨",
        }
    }
}

/// Driving advisory for a BAC reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrivingWarning {
    /// At or above the drink-driving line.
    Impaired,
    /// At or above the statutory drunk-driving limit.
    OverLegalLimit,
}

impl DrivingWarning {
    #[must_use]
    pub fn for_bac(bac: f64) -> Option<Self> {
        if bac >= LEGAL_LIMIT_BAC {
            Some(Self::OverLegalLimit)
        } else if bac >= DRIVING_WARNING_BAC {
            Some(Self::Impaired)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Impaired => {
                "⚠️ You are over the drink-driving line (BAC ≥ 0.02%). Do not drive!"
            }
            Self::OverLegalLimit => {
                "🚨 You are over the legal drunk-driving limit (BAC ≥ 0.08%). Driving now is a crime and a danger!"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn grams_for_a_standard_beer() {
        let grams = alcohol_grams(330.0, 3.5);
        assert!(close(grams, 330.0 * 0.035 * 0.789));
        assert!((grams - 9.12).abs() < 0.01);
        assert!(close(alcohol_grams(0.0, 40.0), 0.0));
        assert!(close(alcohol_grams(500.0, 0.0), 0.0));
    }

    #[test]
    fn grams_are_linear() {
        let base = alcohol_grams(100.0, 10.0);
        assert!(close(alcohol_grams(200.0, 10.0), base * 2.0));
        assert!(close(alcohol_grams(100.0, 30.0), base * 3.0));
    }

    #[test]
    fn widmark_reference_values() {
        // 9.12 / (70 * 0.68 * 10) = 0.01916, still below the first organ threshold
        assert!(close(bac(9.12, 70.0, Sex::Male, false, 0.0), 0.0192));
        // 20 g, 60 kg female: 20 / (60 * 0.55 * 10) = 0.060606
        assert!(close(bac(20.0, 60.0, Sex::Female, false, 0.0), 0.0606));
        assert!(close(bac(0.0, 70.0, Sex::Male, true, 0.0), 0.0));
    }

    #[test]
    fn fasting_scales_peak() {
        let fed = bac(40.0, 70.0, Sex::Male, false, 0.0);
        let fasting = bac(40.0, 70.0, Sex::Male, true, 0.0);
        assert!((fasting - fed * 1.3).abs() <= 0.0001);
    }

    #[test]
    fn decay_uses_age_zero_by_default() {
        let peak = 40.0 / (70.0 * 0.68 * 10.0);
        let expected = round_bac(peak - 0.015 * 1.1 * 2.0);
        assert!(close(bac(40.0, 70.0, Sex::Male, false, 2.0), expected));

        let senior = bac_with_decay_age(40.0, 70.0, Sex::Male, false, 2.0, 60);
        assert!(close(senior, round_bac(peak - 0.015 * 0.8 * 2.0)));
        assert!(senior > bac(40.0, 70.0, Sex::Male, false, 2.0));
    }

    #[test]
    fn decay_floors_at_zero() {
        assert!(close(bac(5.0, 90.0, Sex::Male, false, 24.0), 0.0));
    }

    #[test]
    fn metabolism_multipliers_compose() {
        assert!(close(metabolism_rate(30, Sex::Male), 0.015));
        assert!(close(metabolism_rate(50, Sex::Male), 0.015));
        assert!(close(metabolism_rate(25, Sex::Male), 0.015));
        assert!(close(metabolism_rate(51, Sex::Male), 0.012));
        assert!(close(metabolism_rate(24, Sex::Male), 0.0165));
        assert!(close(metabolism_rate(60, Sex::Female), 0.015 * 0.8 * 0.85));
        assert!(close(metabolism_rate(0, Sex::Female), 0.015 * 1.1 * 0.85));
    }

    #[test]
    fn sober_time_rounds_up_to_tenths() {
        assert!(close(time_to_sober(0.0, 30, Sex::Male), 0.0));
        assert!(close(time_to_sober(-0.1, 30, Sex::Male), 0.0));
        // 0.05 / 0.015 = 3.333.. -> 3.4
        assert!(close(time_to_sober(0.05, 30, Sex::Male), 3.4));
        // 0.1 / 0.0102 = 9.80.. -> 9.9
        assert!(close(time_to_sober(0.1, 60, Sex::Female), 9.9));
    }

    #[test]
    fn sober_time_formatting() {
        assert_eq!(format_sober_time(0.0), "sober");
        assert_eq!(format_sober_time(-1.0), "sober");
        assert_eq!(format_sober_time(0.5), "30 min");
        assert_eq!(format_sober_time(2.0), "2 h");
        assert_eq!(format_sober_time(3.4), "3 h 24 min");
        assert_eq!(
            SoberEta::from_hours(1.25),
            SoberEta::In {
                hours: 1,
                minutes: 15
            }
        );
    }

    #[test]
    fn bands_follow_cut_points() {
        assert_eq!(BacBand::classify(0.0), BacBand::Sober);
        assert_eq!(BacBand::classify(0.0199), BacBand::Sober);
        assert_eq!(BacBand::classify(0.02), BacBand::Tipsy);
        assert_eq!(BacBand::classify(0.05), BacBand::Buzzed);
        assert_eq!(BacBand::classify(0.08), BacBand::Drunk);
        assert_eq!(BacBand::classify(0.15), BacBand::Danger);
        assert_eq!(BacBand::classify(0.4), BacBand::Danger);
    }

    #[test]
    fn driving_warning_thresholds() {
        assert_eq!(DrivingWarning::for_bac(0.0199), None);
        assert_eq!(
            DrivingWarning::for_bac(0.02),
            Some(DrivingWarning::Impaired)
        );
        assert_eq!(
            DrivingWarning::for_bac(0.08),
            Some(DrivingWarning::OverLegalLimit)
        );
    }
}
