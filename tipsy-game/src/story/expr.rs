//! Serializable guard predicates and stat effects for story choices.
//!
//! Both are evaluated against the stats snapshot taken before the choice
//! resolves, so effects never observe each other's output.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::stats::{Stat, StatsPatch, StoryStats};
use crate::numbers::{round_bac, round_f64_to_i32};

/// Gate on whether a choice can be taken. Side-effect free.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Guard {
    StatAtLeast { stat: Stat, value: f64 },
    StatBelow { stat: Stat, value: f64 },
    HasItem { item: String },
    All { of: Vec<Guard> },
    Any { of: Vec<Guard> },
    Not { guard: Box<Guard> },
}

impl Guard {
    #[must_use]
    pub fn allows(&self, stats: &StoryStats) -> bool {
        match self {
            Self::StatAtLeast { stat, value } => stats.value(*stat) >= *value,
            Self::StatBelow { stat, value } => stats.value(*stat) < *value,
            Self::HasItem { item } => stats.has_item(item),
            Self::All { of } => of.iter().all(|guard| guard.allows(stats)),
            Self::Any { of } => of.iter().any(|guard| guard.allows(stats)),
            Self::Not { guard } => !guard.allows(stats),
        }
    }
}

/// One stat operation inside an [`Effect`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StatOp {
    /// `previous + delta`, optionally floored.
    Adjust {
        stat: Stat,
        delta: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        floor: Option<f64>,
    },
    /// Overwrite with a constant.
    Set { stat: Stat, value: f64 },
    AddItem { item: String },
    RemoveItem { item: String },
}

/// Ordered stat operations producing a partial update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Effect {
    pub ops: SmallVec<[StatOp; 3]>,
}

impl Effect {
    #[must_use]
    pub fn new(ops: impl IntoIterator<Item = StatOp>) -> Self {
        Self {
            ops: ops.into_iter().collect(),
        }
    }

    /// Compute the partial update against `previous`.
    ///
    /// Scalar ops read `previous`; when two ops target the same stat the later
    /// one wins. Item ops apply in order to a copy of the previous inventory.
    #[must_use]
    pub fn patch(&self, previous: &StoryStats) -> StatsPatch {
        let mut patch = StatsPatch::default();
        for op in &self.ops {
            match op {
                StatOp::Adjust { stat, delta, floor } => {
                    let mut next = previous.value(*stat) + delta;
                    if let Some(floor) = floor {
                        next = next.max(*floor);
                    }
                    write_stat(&mut patch, *stat, next);
                }
                StatOp::Set { stat, value } => write_stat(&mut patch, *stat, *value),
                StatOp::AddItem { item } => {
                    let inventory = patch
                        .inventory
                        .get_or_insert_with(|| previous.inventory.clone());
                    inventory.push(item.clone());
                }
                StatOp::RemoveItem { item } => {
                    let inventory = patch
                        .inventory
                        .get_or_insert_with(|| previous.inventory.clone());
                    if let Some(pos) = inventory.iter().position(|held| held == item) {
                        inventory.remove(pos);
                    }
                }
            }
        }
        patch
    }
}

fn write_stat(patch: &mut StatsPatch, stat: Stat, value: f64) {
    match stat {
        Stat::Bac => patch.bac = Some(round_bac(value)),
        Stat::Money => patch.money = Some(round_f64_to_i32(value)),
        Stat::Energy => patch.energy = Some(round_f64_to_i32(value)),
        Stat::Social => patch.social = Some(round_f64_to_i32(value)),
    }
}
