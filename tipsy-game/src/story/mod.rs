//! Branching story: content graph, guards and effects, and the traversal engine.
//!
//! Content is validated once when the graph is built; the engine only ever
//! moves along pre-resolved node indices.

mod engine;
mod expr;
mod graph;
mod stats;

pub use engine::{ChoiceView, StoryEngine, StoryError, Transition};
pub use expr::{Effect, Guard, StatOp};
pub use graph::{
    Ending, EndingTier, Npc, SceneMood, StoryChoice, StoryContent, StoryGraph, StoryGraphError,
    StoryNode,
};
pub use stats::{Stat, StatsPatch, StoryStats};
