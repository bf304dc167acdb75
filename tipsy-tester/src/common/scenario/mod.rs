use anyhow::Result;

pub mod catalog;

/// What one passing iteration reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationOutcome {
    /// Short human-readable line for verbose output.
    pub detail: String,
    /// Everything the run decided, in order. Replays must match exactly.
    pub transcript: String,
}

pub type ScenarioFn = fn(u64) -> Result<IterationOutcome>;

#[derive(Debug, Clone)]
pub struct TestScenario {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    run: ScenarioFn,
}

impl TestScenario {
    #[must_use]
    pub const fn new(
        key: &'static str,
        name: &'static str,
        description: &'static str,
        run: ScenarioFn,
    ) -> Self {
        Self {
            key,
            name,
            description,
            run,
        }
    }

    /// Run one iteration with its own seed.
    ///
    /// # Errors
    ///
    /// Returns the first violated expectation.
    pub fn run(&self, seed: u64) -> Result<IterationOutcome> {
        (self.run)(seed)
    }
}

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    let key = name.trim().to_lowercase();
    catalog::catalog_scenarios()
        .into_iter()
        .find(|scenario| scenario.key == key || scenario.name.eq_ignore_ascii_case(&key))
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    catalog::catalog_scenarios()
        .into_iter()
        .map(|scenario| (scenario.key, scenario.description))
        .chain(std::iter::once(("all", "Every scenario above")))
        .collect()
}

/// Expand `all` in place; unknown names are kept so the runner can report them.
pub fn expand_scenarios(names: &[String]) -> Vec<String> {
    let mut expanded: Vec<String> = Vec::new();
    for name in names {
        if name.eq_ignore_ascii_case("all") {
            for scenario in catalog::catalog_scenarios() {
                expanded.push(scenario.key.to_string());
            }
        } else {
            expanded.push(name.clone());
        }
    }
    let mut seen = std::collections::HashSet::new();
    expanded.retain(|name| seen.insert(name.to_lowercase()));
    expanded
}
