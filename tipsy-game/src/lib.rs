//! Tipsy Game Engine
//!
//! Platform-agnostic core of the Tipsy alcohol-awareness simulator: the BAC
//! model, organ and achievement engines, the drinking session, the branching
//! Friday-night story and the reaction mini-game. Nothing in this crate does
//! I/O; bundled content is embedded JSON.

pub mod achievements;
pub mod bac;
pub mod character;
pub mod constants;
pub mod drinks;
pub mod flow;
pub mod numbers;
pub mod organs;
pub mod reaction;
pub mod result;
pub mod session;
pub mod story;

// Re-export commonly used types
pub use achievements::{
    Achievement, AchievementCatalog, AchievementStats, Condition, Rarity, check_achievements,
};
pub use bac::{
    BacBand, DrivingWarning, SoberEta, alcohol_grams, bac, bac_with_decay_age, format_sober_time,
    metabolism_rate, time_to_sober,
};
pub use character::{Character, CharacterError, CharacterProfile, Sex, Tolerance};
pub use drinks::{Drink, DrinkCatalog};
pub use flow::{FlowError, GameMode, Screen, SessionFlow};
pub use organs::{
    Organ, OrganState, OrganStatus, OrganTextCatalog, all_organ_states, organ_state, organ_status,
};
pub use reaction::{
    ReactionComparison, ReactionGame, ReactionPhase, ReactionRound, Target, shake_period,
};
pub use result::{SessionSummary, Verdict, health_tips};
pub use session::{DrinkRecord, DrinkingSession};
pub use story::{
    ChoiceView, Effect, Ending, EndingTier, Guard, StatOp, StatsPatch, StoryEngine, StoryError,
    StoryGraph, StoryGraphError, StoryStats, Transition,
};
