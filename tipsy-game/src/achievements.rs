//! Achievement catalog and unlock evaluation.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

const DEFAULT_ACHIEVEMENT_DATA: &str = include_str!("../assets/data/achievements.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
    Hidden,
}

impl Rarity {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
            Self::Hidden => "hidden",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Rare => "Rare",
            Self::Epic => "Epic",
            Self::Legendary => "Legendary",
            Self::Hidden => "Hidden",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Snapshot of session statistics that achievement conditions are evaluated against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AchievementStats {
    pub total_alcohol: f64,
    pub max_bac: f64,
    pub drinks_count: u32,
    #[serde(default)]
    pub drink_types: BTreeSet<String>,
    #[serde(default)]
    pub click_count: Option<u32>,
}

impl AchievementStats {
    #[must_use]
    pub fn distinct_types(&self) -> usize {
        self.drink_types.len()
    }
}

/// Declarative unlock predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    DrinksAtLeast { count: u32 },
    DrinksExactly { count: u32 },
    MaxBacAtLeast { bac: f64 },
    MaxBacBelow { bac: f64 },
    TotalAlcoholAtLeast { grams: f64 },
    DistinctTypesAtLeast { count: usize },
    ClicksAtLeast { count: u32 },
    All { of: Vec<Condition> },
}

impl Condition {
    #[must_use]
    pub fn holds(&self, stats: &AchievementStats) -> bool {
        match self {
            Self::DrinksAtLeast { count } => stats.drinks_count >= *count,
            Self::DrinksExactly { count } => stats.drinks_count == *count,
            Self::MaxBacAtLeast { bac } => stats.max_bac >= *bac,
            Self::MaxBacBelow { bac } => stats.max_bac < *bac,
            Self::TotalAlcoholAtLeast { grams } => stats.total_alcohol >= *grams,
            Self::DistinctTypesAtLeast { count } => stats.distinct_types() >= *count,
            Self::ClicksAtLeast { count } => stats.click_count.is_some_and(|c| c >= *count),
            Self::All { of } => of.iter().all(|condition| condition.holds(stats)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub rarity: Rarity,
    pub condition: Condition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AchievementCatalog {
    #[serde(default)]
    pub achievements: Vec<Achievement>,
}

impl AchievementCatalog {
    #[must_use]
    pub fn load_from_static() -> Self {
        serde_json::from_str(DEFAULT_ACHIEVEMENT_DATA).unwrap_or_default()
    }

    #[must_use]
    pub fn default_catalog() -> &'static Self {
        static CATALOG: OnceLock<AchievementCatalog> = OnceLock::new();
        CATALOG.get_or_init(Self::load_from_static)
    }

    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into an achievement catalog.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.id == id)
    }

    /// Achievements newly satisfied by `stats`, in catalog order.
    ///
    /// Entries whose id already appears in `unlocked` are skipped without
    /// evaluating their condition.
    #[must_use]
    pub fn check<S: AsRef<str>>(
        &self,
        stats: &AchievementStats,
        unlocked: &[S],
    ) -> Vec<&Achievement> {
        self.achievements
            .iter()
            .filter(|a| !unlocked.iter().any(|id| id.as_ref() == a.id))
            .filter(|a| a.condition.holds(stats))
            .collect()
    }
}

/// [`AchievementCatalog::check`] against the bundled catalog.
#[must_use]
pub fn check_achievements<S: AsRef<str>>(
    stats: &AchievementStats,
    unlocked: &[S],
) -> Vec<&'static Achievement> {
    AchievementCatalog::default_catalog().check(stats, unlocked)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&Achievement]) -> Vec<String> {
        list.iter().map(|a| a.id.clone()).collect()
    }

    fn stats(drinks: u32, max_bac: f64, total: f64, types: &[&str]) -> AchievementStats {
        AchievementStats {
            total_alcohol: total,
            max_bac,
            drinks_count: drinks,
            drink_types: types.iter().map(|t| (*t).to_string()).collect(),
            click_count: None,
        }
    }

    #[test]
    fn bundled_catalog_order() {
        let catalog = AchievementCatalog::default_catalog();
        let order: Vec<&str> = catalog.achievements.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(
            order,
            [
                "first_drop",
                "tipsy",
                "three_drinks",
                "mixing_master",
                "iron_liver",
                "responsible",
                "five_types",
                "danger_zone",
                "marathon",
                "all_types",
                "social_butterfly",
                "sober_king",
                "heavy200",
                "zero_drinks",
                "one_shot",
            ]
        );
        let unique: BTreeSet<&str> = order.iter().copied().collect();
        assert_eq!(unique.len(), order.len());
    }

    #[test]
    fn zero_drinks_only_unlocks_teetotaler() {
        let unlocked: Vec<String> = Vec::new();
        let found = check_achievements(&AchievementStats::default(), &unlocked);
        assert_eq!(ids(&found), ["zero_drinks"]);
    }

    #[test]
    fn single_strong_drink_unlocks_one_shot() {
        let s = stats(1, 0.09, 28.0, &["baijiu"]);
        let found = check_achievements(&s, &[] as &[&str]);
        assert_eq!(ids(&found), ["first_drop", "tipsy", "one_shot"]);
    }

    #[test]
    fn compound_conditions() {
        let s = stats(6, 0.04, 60.0, &["beer"]);
        let found = check_achievements(&s, &["first_drop", "three_drinks"]);
        assert_eq!(ids(&found), ["responsible", "sober_king"]);

        let heavy = stats(12, 0.2, 210.0, &["beer", "sake", "vodka", "whiskey", "baijiu"]);
        let found = check_achievements(&heavy, &[] as &[&str]);
        assert_eq!(
            ids(&found),
            [
                "first_drop",
                "tipsy",
                "three_drinks",
                "mixing_master",
                "iron_liver",
                "five_types",
                "danger_zone",
                "marathon",
                "heavy200",
            ]
        );
    }

    #[test]
    fn never_reports_unlocked_ids_and_is_idempotent() {
        let s = stats(3, 0.06, 40.0, &["beer", "sake", "vodka"]);
        let mut unlocked: Vec<String> = vec!["tipsy".to_string()];
        let first = check_achievements(&s, &unlocked);
        assert!(first.iter().all(|a| a.id != "tipsy"));
        assert_eq!(ids(&first), ["first_drop", "three_drinks", "mixing_master"]);

        unlocked.extend(ids(&first));
        assert!(check_achievements(&s, &unlocked).is_empty());
    }

    #[test]
    fn click_condition_requires_a_counter() {
        let condition = Condition::ClicksAtLeast { count: 5 };
        let mut s = AchievementStats::default();
        assert!(!condition.holds(&s));
        s.click_count = Some(5);
        assert!(condition.holds(&s));
    }

    #[test]
    fn conditions_parse_from_tagged_json() {
        let parsed: Condition = serde_json::from_str(
            r#"{"kind":"all","of":[{"kind":"drinks_exactly","count":2},{"kind":"clicks_at_least","count":1}]}"#,
        )
        .unwrap();
        assert_eq!(
            parsed,
            Condition::All {
                of: vec![
                    Condition::DrinksExactly { count: 2 },
                    Condition::ClicksAtLeast { count: 1 },
                ]
            }
        );
    }
}
