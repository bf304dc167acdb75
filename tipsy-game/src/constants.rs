//! Centralized simulation constants for the Tipsy engines.
//!
//! The numeric model lives in code so that it can only change through
//! reviewed commits. Display content (drink names, organ quotes, story
//! prose) lives in the JSON assets instead.

// Log targets --------------------------------------------------------------
pub(crate) const LOG_SESSION: &str = "tipsy::session";
pub(crate) const LOG_STORY: &str = "tipsy::story";
pub(crate) const LOG_ACHIEVEMENTS: &str = "tipsy::achievements";

// Widmark model ------------------------------------------------------------
/// Ethanol density in grams per millilitre.
pub const ETHANOL_DENSITY_G_PER_ML: f64 = 0.789;
pub const DISTRIBUTION_RATIO_MALE: f64 = 0.68;
pub const DISTRIBUTION_RATIO_FEMALE: f64 = 0.55;
/// Peak multiplier applied when drinking on an empty stomach.
pub const FASTING_MULTIPLIER: f64 = 1.3;
/// `grams / (kg * r * 10)` yields a percentage.
pub(crate) const WIDMARK_PERCENT_SCALE: f64 = 10.0;
pub(crate) const BAC_DECIMALS_SCALE: f64 = 10_000.0;
/// Age passed to the metabolism curve by [`crate::bac::bac`].
pub const LEGACY_DECAY_AGE: u32 = 0;

// Metabolism ---------------------------------------------------------------
/// Average elimination in BAC percentage points per hour.
pub const BASE_METABOLISM_RATE: f64 = 0.015;
pub(crate) const SENIOR_AGE_THRESHOLD: u32 = 50;
pub(crate) const SENIOR_METABOLISM_FACTOR: f64 = 0.8;
pub(crate) const YOUNG_AGE_THRESHOLD: u32 = 25;
pub(crate) const YOUNG_METABOLISM_FACTOR: f64 = 1.1;
pub(crate) const FEMALE_METABOLISM_FACTOR: f64 = 0.85;
pub(crate) const SOBER_TIME_STEPS_PER_HOUR: f64 = 10.0;
pub(crate) const MINUTES_PER_HOUR: f64 = 60.0;

// BAC bands ----------------------------------------------------------------
pub const TIPSY_BAC: f64 = 0.02;
pub const BUZZED_BAC: f64 = 0.05;
pub const DRUNK_BAC: f64 = 0.08;
pub const DANGER_BAC: f64 = 0.15;
/// Any driving at or above this BAC is flagged.
pub const DRIVING_WARNING_BAC: f64 = TIPSY_BAC;
/// Statutory drunk-driving line.
pub const LEGAL_LIMIT_BAC: f64 = DRUNK_BAC;

// Character bounds ---------------------------------------------------------
pub const MIN_WEIGHT_KG: f64 = 30.0;
pub const MAX_WEIGHT_KG: f64 = 150.0;
pub const MIN_AGE: u32 = 18;
pub const MAX_AGE: u32 = 80;
pub(crate) const DEFAULT_WEIGHT_KG: f64 = 65.0;
pub(crate) const DEFAULT_AGE: u32 = 25;
pub(crate) const DEFAULT_MALE_NAME: &str = "Alex";
pub(crate) const DEFAULT_FEMALE_NAME: &str = "Sam";

// Organs -------------------------------------------------------------------
pub(crate) const BRAIN_THRESHOLDS: [f64; 4] = [0.02, 0.05, 0.08, 0.15];
pub(crate) const LIVER_THRESHOLDS: [f64; 4] = [0.03, 0.06, 0.10, 0.18];
pub(crate) const STOMACH_THRESHOLDS: [f64; 4] = [0.02, 0.05, 0.09, 0.15];
pub(crate) const HEART_THRESHOLDS: [f64; 4] = [0.04, 0.08, 0.13, 0.20];
pub(crate) const KIDNEY_THRESHOLDS: [f64; 4] = [0.03, 0.07, 0.12, 0.18];
/// Health percentage per severity tier, mildest first.
pub(crate) const ORGAN_HEALTH_TABLE: [u8; 5] = [100, 80, 55, 30, 10];

// Story --------------------------------------------------------------------
pub const STORY_START_NODE: &str = "start";
pub(crate) const STORY_INITIAL_MONEY: i32 = 500;
pub(crate) const STORY_INITIAL_ENERGY: i32 = 100;

// Reaction mini-game -------------------------------------------------------
pub const REACTION_ROUND_SECS: u32 = 15;
pub(crate) const FIRST_SPAWN_DELAY_MS: u64 = 500;
pub(crate) const TARGET_MIN_X: f64 = 10.0;
pub(crate) const TARGET_SPAN_X: f64 = 75.0;
pub(crate) const TARGET_MIN_Y: f64 = 10.0;
pub(crate) const TARGET_SPAN_Y: f64 = 70.0;
pub(crate) const JITTER_CLAMP_X: (f64, f64) = (5.0, 85.0);
pub(crate) const JITTER_CLAMP_Y: (f64, f64) = (5.0, 80.0);
pub(crate) const JITTER_BAC_SCALE: f64 = 100.0;
pub(crate) const TARGET_LIFETIME_MS: u32 = 1_000;
pub(crate) const DRUNK_TARGET_MIN_LIFETIME_MS: f64 = 600.0;
pub(crate) const DRUNK_LIFETIME_BAC_SCALE: f64 = 2_000.0;
pub(crate) const SOBER_RESPAWN_MS: (u32, u32) = (1_000, 300);
pub(crate) const DRUNK_RESPAWN_MS: (u32, u32) = (1_200, 400);
pub(crate) const SOBER_HIT_RESPAWN_MS: (u32, u32) = (300, 300);
pub(crate) const DRUNK_HIT_RESPAWN_MS: (u32, u32) = (500, 500);
pub(crate) const SHAKE_BAC: f64 = 0.03;
pub(crate) const SHAKE_MIN_PERIOD_SECS: f64 = 0.3;
pub(crate) const SHAKE_PERIOD_BAC_SCALE: f64 = 3.0;
