use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

pub type PromptParams = BTreeMap<String, String>;

const DRUNK_TALK: &str = "\
You imitate the way a drunk person talks. Rewrite the sober sentence below in a drunk voice.
Rules:
- Scrambled word order but the same meaning
- Repeat key words
- Add fillers (oh man, seriously, you know what, listen to me)
- Let the emotions show more
- Maybe blurt out a hidden thought
- Drunkenness (BAC): {bac}

Original: {input}

Reply with the drunk version only, no explanation:";

const ORGAN_DIALOG: &str = "\
Write a funny, personified conversation between organs. Current state:
- Liver load: {liverLoad}%
- Brain clarity: {brainClarity}%
- BAC: {bac}%

Keep it funny, cute and educational. Write 3-5 lines of dialogue between organs.
Format: [Organ]: \"line\"";

const HEALTH_ADVICE: &str = "\
Write personalised advice about healthier drinking from this information:
- Age: {age}
- Sex: {gender}
- Weight: {weight} kg
- Alcohol this session: {totalAlcohol} g
- Peak BAC: {maxBac}%

Give 3-5 practical tips in a friendly but serious tone.";

const STORY_BRANCH: &str = "\
You are an interactive story generator. Scene: {scene}
The player chose: {choice}
Current BAC: {bac}

Write what happens next (2-3 paragraphs) and 2-3 new options.
Format:
[Story]
Option 1: ...
Option 2: ...
Option 3 (optional): ...";

/// The four generation features the game can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptTemplate {
    DrunkTalk,
    OrganDialog,
    HealthAdvice,
    StoryBranch,
}

impl PromptTemplate {
    pub const ALL: [Self; 4] = [
        Self::DrunkTalk,
        Self::OrganDialog,
        Self::HealthAdvice,
        Self::StoryBranch,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::DrunkTalk => "drunk_talk",
            Self::OrganDialog => "organ_dialog",
            Self::HealthAdvice => "health_advice",
            Self::StoryBranch => "story_branch",
        }
    }

    #[must_use]
    pub const fn template(self) -> &'static str {
        match self {
            Self::DrunkTalk => DRUNK_TALK,
            Self::OrganDialog => ORGAN_DIALOG,
            Self::HealthAdvice => HEALTH_ADVICE,
            Self::StoryBranch => STORY_BRANCH,
        }
    }

    /// Parameter names the template interpolates.
    #[must_use]
    pub const fn params(self) -> &'static [&'static str] {
        match self {
            Self::DrunkTalk => &["bac", "input"],
            Self::OrganDialog => &["liverLoad", "brainClarity", "bac"],
            Self::HealthAdvice => &["age", "gender", "weight", "totalAlcohol", "maxBac"],
            Self::StoryBranch => &["scene", "choice", "bac"],
        }
    }

    /// Fill the template. Values are inserted verbatim in one pass, so braces
    /// inside a value are never expanded; missing params render as empty.
    #[must_use]
    pub fn render(self, params: &PromptParams) -> String {
        let template = self.template();
        let Some(placeholder) = placeholder_regex() else {
            return template.to_string();
        };
        placeholder
            .replace_all(template, |caps: &Captures<'_>| {
                params.get(&caps[1]).cloned().unwrap_or_default()
            })
            .into_owned()
    }
}

impl fmt::Display for PromptTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

fn placeholder_regex() -> Option<&'static Regex> {
    static PLACEHOLDER: OnceLock<Option<Regex>> = OnceLock::new();
    PLACEHOLDER
        .get_or_init(|| Regex::new(r"\{([A-Za-z]+)\}").ok())
        .as_ref()
}

/// Build a [`PromptParams`] map from borrowed pairs.
#[must_use]
pub fn params<const N: usize>(pairs: [(&str, String); N]) -> PromptParams {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_declared_param_appears_in_its_template() {
        for template in PromptTemplate::ALL {
            for name in template.params() {
                assert!(
                    template.template().contains(&format!("{{{name}}}")),
                    "{template} is missing {name}"
                );
            }
        }
    }

    #[test]
    fn renders_values_and_blanks_missing_ones() {
        let rendered = PromptTemplate::DrunkTalk.render(&params([("bac", "0.08%".to_string())]));
        assert!(rendered.contains("Drunkenness (BAC): 0.08%"));
        assert!(rendered.contains("Original: \n"));
        assert!(!rendered.contains('{'));
    }

    #[test]
    fn values_are_not_re_expanded() {
        let rendered = PromptTemplate::StoryBranch.render(&params([
            ("scene", "{choice}".to_string()),
            ("choice", "dance".to_string()),
        ]));
        assert!(rendered.contains("Scene: {choice}"));
        assert!(rendered.contains("The player chose: dance"));
    }
}
