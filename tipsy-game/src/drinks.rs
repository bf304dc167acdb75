use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::bac::alcohol_grams;

const DEFAULT_DRINK_DATA: &str = include_str!("../assets/data/drinks.json");

/// A catalog entry. Read-only reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drink {
    pub id: String,
    pub name: String,
    pub volume_ml: f64,
    pub strength_percent: f64,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
}

impl Drink {
    #[must_use]
    pub fn alcohol_grams(&self) -> f64 {
        alcohol_grams(self.volume_ml, self.strength_percent)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DrinkCatalog {
    #[serde(default)]
    pub drinks: Vec<Drink>,
}

impl DrinkCatalog {
    #[must_use]
    pub fn load_from_static() -> Self {
        serde_json::from_str(DEFAULT_DRINK_DATA).unwrap_or_default()
    }

    #[must_use]
    pub fn default_catalog() -> &'static Self {
        static CATALOG: OnceLock<DrinkCatalog> = OnceLock::new();
        CATALOG.get_or_init(Self::load_from_static)
    }

    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a drink catalog.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Drink> {
        self.drinks.iter().find(|drink| drink.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Drink> {
        self.drinks.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.drinks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drinks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_catalog_has_eight_drinks() {
        let catalog = DrinkCatalog::default_catalog();
        assert_eq!(catalog.len(), 8);
        let ids: Vec<&str> = catalog.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(
            ids,
            [
                "beer",
                "red-wine",
                "baijiu",
                "whiskey",
                "cocktail",
                "long-island",
                "sake",
                "vodka"
            ]
        );
    }

    #[test]
    fn lookup_and_grams() {
        let catalog = DrinkCatalog::default_catalog();
        let baijiu = catalog.get("baijiu").unwrap();
        assert!((baijiu.alcohol_grams() - 50.0 * 0.56 * 0.789).abs() < 1e-9);
        assert!(catalog.get("absinthe").is_none());
    }

    #[test]
    fn custom_catalog_from_json() {
        let catalog = DrinkCatalog::from_json(
            r#"{"drinks":[{"id":"cider","name":"Cider","volume_ml":500,"strength_percent":5}]}"#,
        )
        .unwrap();
        let cider = catalog.get("cider").unwrap();
        assert!(cider.icon.is_empty());
        assert!(DrinkCatalog::from_json("{").is_err());
    }
}
