//! Story content model and the validated, index-resolved graph built from it.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, OnceLock};
use thiserror::Error;

use super::expr::{Effect, Guard};
use crate::constants::STORY_START_NODE;

const DEFAULT_STORY_DATA: &str = include_str!("../../assets/data/story.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneMood {
    Chill,
    Exciting,
    Tense,
    Romantic,
    Danger,
    Funny,
    Sad,
    Warm,
}

impl SceneMood {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Chill => "chill",
            Self::Exciting => "exciting",
            Self::Tense => "tense",
            Self::Romantic => "romantic",
            Self::Danger => "danger",
            Self::Funny => "funny",
            Self::Sad => "sad",
            Self::Warm => "warm",
        }
    }
}

impl fmt::Display for SceneMood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Npc {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub dialogue: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryChoice {
    pub text: String,
    pub next: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guard: Option<Guard>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<Effect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryNode {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<SceneMood>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npc: Option<Npc>,
    #[serde(default)]
    pub choices: Vec<StoryChoice>,
}

impl StoryNode {
    /// A node with no outgoing choices ends the story.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.choices.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndingTier {
    Normal,
    Good,
    Perfect,
    Bad,
    Hidden,
    Warning,
}

impl EndingTier {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Good => "good",
            Self::Perfect => "perfect",
            Self::Bad => "bad",
            Self::Hidden => "hidden",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for EndingTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ending {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub tier: EndingTier,
}

fn default_start() -> String {
    STORY_START_NODE.to_string()
}

/// Raw, unvalidated story content as it appears on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryContent {
    #[serde(default = "default_start")]
    pub start: String,
    pub nodes: Vec<StoryNode>,
    /// Ending metadata keyed by terminal node id.
    #[serde(default)]
    pub endings: BTreeMap<String, Ending>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoryGraphError {
    #[error("story content is not valid JSON: {message}")]
    Parse { message: String },
    #[error("start node `{start}` does not exist")]
    MissingStart { start: String },
    #[error("node id `{id}` is defined more than once")]
    DuplicateNode { id: String },
    #[error("choice {choice} of node `{node}` points at unknown node `{target}`")]
    DanglingTarget {
        node: String,
        choice: usize,
        target: String,
    },
    #[error("ending metadata keyed on unknown node `{id}`")]
    UnknownEndingNode { id: String },
}

/// Validated story graph. Every choice target is resolved to a node index.
#[derive(Debug, Clone)]
pub struct StoryGraph {
    nodes: Vec<StoryNode>,
    index: HashMap<String, usize>,
    targets: Vec<Vec<usize>>,
    start: usize,
    endings: BTreeMap<String, Ending>,
}

impl StoryGraph {
    /// Validate content and resolve choice targets.
    ///
    /// # Errors
    ///
    /// Returns [`StoryGraphError`] when the start node is missing, an id is
    /// duplicated, a choice targets an unknown node, or ending metadata is
    /// keyed on an unknown node.
    pub fn new(content: StoryContent) -> Result<Self, StoryGraphError> {
        let StoryContent {
            start,
            nodes,
            endings,
        } = content;

        let mut index = HashMap::with_capacity(nodes.len());
        for (position, node) in nodes.iter().enumerate() {
            if index.insert(node.id.clone(), position).is_some() {
                return Err(StoryGraphError::DuplicateNode {
                    id: node.id.clone(),
                });
            }
        }

        let start_idx = *index
            .get(&start)
            .ok_or(StoryGraphError::MissingStart { start })?;

        let mut targets = Vec::with_capacity(nodes.len());
        for node in &nodes {
            let mut resolved = Vec::with_capacity(node.choices.len());
            for (choice_idx, choice) in node.choices.iter().enumerate() {
                let target = index.get(&choice.next).copied().ok_or_else(|| {
                    StoryGraphError::DanglingTarget {
                        node: node.id.clone(),
                        choice: choice_idx,
                        target: choice.next.clone(),
                    }
                })?;
                resolved.push(target);
            }
            targets.push(resolved);
        }

        if let Some(id) = endings.keys().find(|id| !index.contains_key(*id)) {
            return Err(StoryGraphError::UnknownEndingNode { id: id.clone() });
        }

        Ok(Self {
            nodes,
            index,
            targets,
            start: start_idx,
            endings,
        })
    }

    /// # Errors
    ///
    /// Returns [`StoryGraphError::Parse`] for malformed JSON, otherwise any
    /// validation error from [`StoryGraph::new`].
    pub fn from_json(json: &str) -> Result<Self, StoryGraphError> {
        let content: StoryContent =
            serde_json::from_str(json).map_err(|err| StoryGraphError::Parse {
                message: err.to_string(),
            })?;
        Self::new(content)
    }

    /// # Errors
    ///
    /// Returns an error if the bundled story asset fails validation.
    pub fn load_from_static() -> Result<Self, StoryGraphError> {
        Self::from_json(DEFAULT_STORY_DATA)
    }

    /// Shared handle to the bundled graph, validated once.
    ///
    /// # Errors
    ///
    /// Returns the validation error of the bundled asset.
    pub fn default_graph() -> Result<Arc<Self>, StoryGraphError> {
        static GRAPH: OnceLock<Result<Arc<StoryGraph>, StoryGraphError>> = OnceLock::new();
        GRAPH
            .get_or_init(|| Self::load_from_static().map(Arc::new))
            .clone()
    }

    #[must_use]
    pub fn start_index(&self) -> usize {
        self.start
    }

    #[must_use]
    pub fn start_id(&self) -> &str {
        &self.nodes[self.start].id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&StoryNode> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub(crate) fn node_at(&self, idx: usize) -> &StoryNode {
        &self.nodes[idx]
    }

    pub(crate) fn target(&self, node: usize, choice: usize) -> Option<usize> {
        self.targets.get(node)?.get(choice).copied()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &StoryNode> {
        self.nodes.iter()
    }

    #[must_use]
    pub fn ending(&self, id: &str) -> Option<&Ending> {
        self.endings.get(id)
    }

    pub fn endings(&self) -> impl Iterator<Item = (&str, &Ending)> {
        self.endings.iter().map(|(id, ending)| (id.as_str(), ending))
    }

    /// Ids of terminal nodes, in content order.
    #[must_use]
    pub fn terminal_ids(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|node| node.is_terminal())
            .map(|node| node.id.as_str())
            .collect()
    }

    /// Terminal nodes reachable from start when guards are ignored, in
    /// content order.
    #[must_use]
    pub fn reachable_endings(&self) -> Vec<&str> {
        let mut seen = vec![false; self.nodes.len()];
        let mut queue = VecDeque::from([self.start]);
        seen[self.start] = true;
        while let Some(idx) = queue.pop_front() {
            for &next in &self.targets[idx] {
                if !seen[next] {
                    seen[next] = true;
                    queue.push_back(next);
                }
            }
        }
        self.nodes
            .iter()
            .zip(seen)
            .filter(|(node, reached)| *reached && node.is_terminal())
            .map(|(node, _)| node.id.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, next: &[&str]) -> StoryNode {
        StoryNode {
            id: id.to_string(),
            text: format!("{id} text"),
            scene: None,
            scene_icon: None,
            mood: None,
            npc: None,
            choices: next
                .iter()
                .map(|target| StoryChoice {
                    text: format!("go {target}"),
                    next: (*target).to_string(),
                    guard: None,
                    effect: None,
                    hint: None,
                })
                .collect(),
        }
    }

    fn content(nodes: Vec<StoryNode>) -> StoryContent {
        StoryContent {
            start: "start".to_string(),
            nodes,
            endings: BTreeMap::new(),
        }
    }

    #[test]
    fn bundled_graph_shape() {
        let graph = StoryGraph::default_graph().unwrap();
        assert_eq!(graph.len(), 37);
        assert_eq!(graph.start_id(), "start");
        assert_eq!(graph.terminal_ids().len(), 8);
        assert_eq!(graph.endings().count(), 8);
        for id in graph.terminal_ids() {
            assert!(graph.ending(id).is_some(), "{id} has no ending metadata");
        }
    }

    #[test]
    fn every_bundled_ending_is_reachable() {
        let graph = StoryGraph::default_graph().unwrap();
        let mut reachable = graph.reachable_endings();
        let mut terminals = graph.terminal_ids();
        reachable.sort_unstable();
        terminals.sort_unstable();
        assert_eq!(reachable, terminals);
    }

    #[test]
    fn rejects_missing_start() {
        let err = StoryGraph::new(content(vec![node("a", &[])])).unwrap_err();
        assert_eq!(
            err,
            StoryGraphError::MissingStart {
                start: "start".to_string()
            }
        );
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err =
            StoryGraph::new(content(vec![node("start", &[]), node("start", &[])])).unwrap_err();
        assert!(matches!(err, StoryGraphError::DuplicateNode { id } if id == "start"));
    }

    #[test]
    fn rejects_dangling_targets() {
        let err = StoryGraph::new(content(vec![node("start", &["a", "nowhere"]), node("a", &[])]))
            .unwrap_err();
        assert_eq!(
            err,
            StoryGraphError::DanglingTarget {
                node: "start".to_string(),
                choice: 1,
                target: "nowhere".to_string(),
            }
        );
    }

    #[test]
    fn rejects_endings_on_unknown_nodes() {
        let mut story = content(vec![node("start", &[])]);
        story.endings.insert(
            "END_GHOST".to_string(),
            Ending {
                title: "Ghost".to_string(),
                description: String::new(),
                icon: String::new(),
                tier: EndingTier::Hidden,
            },
        );
        assert!(matches!(
            StoryGraph::new(story),
            Err(StoryGraphError::UnknownEndingNode { .. })
        ));
    }

    #[test]
    fn cycles_are_allowed_and_unreachable_endings_are_skipped() {
        let graph = StoryGraph::new(content(vec![
            node("start", &["loop", "end"]),
            node("loop", &["start"]),
            node("end", &[]),
            node("orphan_end", &[]),
        ]))
        .unwrap();
        assert_eq!(graph.reachable_endings(), ["end"]);
        assert_eq!(graph.terminal_ids(), ["end", "orphan_end"]);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            StoryGraph::from_json("{\"nodes\": 3}"),
            Err(StoryGraphError::Parse { .. })
        ));
    }
}
