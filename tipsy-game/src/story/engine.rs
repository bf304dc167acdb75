use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use super::graph::{Ending, StoryGraph, StoryGraphError, StoryNode};
use super::stats::{StatsPatch, StoryStats};
use crate::constants::LOG_STORY;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoryError {
    #[error("node `{node}` has no choice {index}")]
    NoSuchChoice { node: String, index: usize },
    #[error("choice {index} of node `{node}` is not available")]
    GuardRejected { node: String, index: usize },
    #[error("the story already ended at `{node}`")]
    AtEnding { node: String },
}

/// A choice as presented to the player, with its guard already evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceView {
    pub index: usize,
    pub text: String,
    pub hint: Option<String>,
    pub target: String,
    pub available: bool,
}

/// Record of one successful `choose`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub from: String,
    pub to: String,
    pub patch: StatsPatch,
}

/// Walks a [`StoryGraph`] while threading [`StoryStats`].
#[derive(Debug, Clone)]
pub struct StoryEngine {
    graph: Arc<StoryGraph>,
    current: usize,
    stats: StoryStats,
    history: Vec<String>,
}

impl StoryEngine {
    #[must_use]
    pub fn new(graph: Arc<StoryGraph>) -> Self {
        let current = graph.start_index();
        Self {
            graph,
            current,
            stats: StoryStats::initial(),
            history: Vec::new(),
        }
    }

    /// Engine over the bundled Friday-night story.
    ///
    /// # Errors
    ///
    /// Returns the validation error if the bundled story is malformed.
    pub fn with_default_graph() -> Result<Self, StoryGraphError> {
        StoryGraph::default_graph().map(Self::new)
    }

    #[must_use]
    pub fn graph(&self) -> &StoryGraph {
        &self.graph
    }

    #[must_use]
    pub fn current_node(&self) -> &StoryNode {
        self.graph.node_at(self.current)
    }

    #[must_use]
    pub fn current_id(&self) -> &str {
        &self.current_node().id
    }

    #[must_use]
    pub fn stats(&self) -> &StoryStats {
        &self.stats
    }

    /// Ids of the nodes left so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    #[must_use]
    pub fn steps(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn is_ending(&self) -> bool {
        self.current_node().is_terminal()
    }

    /// Ending metadata for the current node, if it is a described ending.
    #[must_use]
    pub fn ending(&self) -> Option<&Ending> {
        if self.is_ending() {
            self.graph.ending(self.current_id())
        } else {
            None
        }
    }

    /// Current choices with guards evaluated against the current stats.
    #[must_use]
    pub fn choices(&self) -> Vec<ChoiceView> {
        self.current_node()
            .choices
            .iter()
            .enumerate()
            .map(|(index, choice)| ChoiceView {
                index,
                text: choice.text.clone(),
                hint: choice.hint.clone(),
                target: choice.next.clone(),
                available: choice
                    .guard
                    .as_ref()
                    .is_none_or(|guard| guard.allows(&self.stats)),
            })
            .collect()
    }

    /// Indices of choices whose guard currently passes.
    #[must_use]
    pub fn available_choices(&self) -> Vec<usize> {
        self.choices()
            .into_iter()
            .filter(|view| view.available)
            .map(|view| view.index)
            .collect()
    }

    /// Take choice `index`. On error nothing changes.
    ///
    /// # Errors
    ///
    /// [`StoryError::AtEnding`] on a terminal node, [`StoryError::NoSuchChoice`]
    /// for an out-of-range index, [`StoryError::GuardRejected`] when the guard
    /// fails against the current stats.
    pub fn choose(&mut self, index: usize) -> Result<Transition, StoryError> {
        let node = self.current_node();
        if node.is_terminal() {
            return Err(StoryError::AtEnding {
                node: node.id.clone(),
            });
        }
        let Some(choice) = node.choices.get(index) else {
            return Err(StoryError::NoSuchChoice {
                node: node.id.clone(),
                index,
            });
        };
        if let Some(guard) = &choice.guard
            && !guard.allows(&self.stats)
        {
            log::debug!(
                target: LOG_STORY,
                "choice {index} of `{}` rejected by guard",
                node.id
            );
            return Err(StoryError::GuardRejected {
                node: node.id.clone(),
                index,
            });
        }
        let Some(target) = self.graph.target(self.current, index) else {
            return Err(StoryError::NoSuchChoice {
                node: node.id.clone(),
                index,
            });
        };

        let patch = choice
            .effect
            .as_ref()
            .map(|effect| effect.patch(&self.stats))
            .unwrap_or_default();
        let from = node.id.clone();

        self.stats.merge(patch.clone());
        self.history.push(from.clone());
        self.current = target;

        let to = self.current_id().to_string();
        log::debug!(target: LOG_STORY, "{from} -> {to}");
        Ok(Transition { from, to, patch })
    }

    /// Back to the start node with initial stats and empty history.
    pub fn restart(&mut self) {
        self.current = self.graph.start_index();
        self.stats = StoryStats::initial();
        self.history.clear();
    }
}
