//! Quick-simulation drinking session.
//!
//! Records are the only source of truth. Totals, BAC readings and the peak
//! watermark are all recomputed from the record list, so removing a drink
//! can lower the peak as well as the current reading.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

use crate::achievements::{AchievementCatalog, AchievementStats};
use crate::bac::SoberEta;
use crate::character::Character;
use crate::constants::{LOG_ACHIEVEMENTS, LOG_SESSION};
use crate::drinks::{Drink, DrinkCatalog};
use crate::organs::{OrganState, all_organ_states};
use crate::result::{SessionSummary, Verdict, health_tips};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrinkRecord {
    pub drink_id: String,
    pub timestamp_ms: u64,
    pub alcohol_grams: f64,
}

#[derive(Debug, Clone)]
pub struct DrinkingSession {
    character: Character,
    catalog: DrinkCatalog,
    records: Vec<DrinkRecord>,
    max_bac: f64,
    click_count: Option<u32>,
    unlocked: Vec<String>,
    pending: VecDeque<String>,
}

impl DrinkingSession {
    /// Session over the bundled drink catalog.
    #[must_use]
    pub fn new(character: Character) -> Self {
        Self::with_catalog(character, DrinkCatalog::default_catalog().clone())
    }

    #[must_use]
    pub fn with_catalog(character: Character, catalog: DrinkCatalog) -> Self {
        Self {
            character,
            catalog,
            records: Vec::new(),
            max_bac: 0.0,
            click_count: None,
            unlocked: Vec::new(),
            pending: VecDeque::new(),
        }
    }

    /// Seed the unlocked list, e.g. when carrying progress into a new session.
    #[must_use]
    pub fn with_unlocked(mut self, unlocked: Vec<String>) -> Self {
        self.unlocked = unlocked;
        self
    }

    #[must_use]
    pub fn character(&self) -> &Character {
        &self.character
    }

    #[must_use]
    pub fn catalog(&self) -> &DrinkCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn records(&self) -> &[DrinkRecord] {
        &self.records
    }

    /// Log a drink. Unknown ids are ignored and return `None`.
    pub fn drink(&mut self, drink_id: &str, timestamp_ms: u64) -> Option<&DrinkRecord> {
        let Some(drink) = self.catalog.get(drink_id) else {
            log::warn!(target: LOG_SESSION, "ignoring unknown drink id `{drink_id}`");
            return None;
        };
        let record = DrinkRecord {
            drink_id: drink.id.clone(),
            timestamp_ms,
            alcohol_grams: drink.alcohol_grams(),
        };
        log::debug!(
            target: LOG_SESSION,
            "drink #{} {} ({:.1} g)",
            self.records.len() + 1,
            record.drink_id,
            record.alcohol_grams
        );
        self.records.push(record);
        self.recompute();
        self.records.last()
    }

    /// Remove the most recent drink.
    pub fn undo_last(&mut self) -> Option<DrinkRecord> {
        let removed = self.records.pop()?;
        log::debug!(target: LOG_SESSION, "undo {}", removed.drink_id);
        self.recompute();
        Some(removed)
    }

    /// Remove the drink at `index`; out-of-range indices are a no-op.
    pub fn remove(&mut self, index: usize) -> Option<DrinkRecord> {
        if index >= self.records.len() {
            return None;
        }
        let removed = self.records.remove(index);
        log::debug!(target: LOG_SESSION, "removed {} at {index}", removed.drink_id);
        self.recompute();
        Some(removed)
    }

    /// Record reaction-game clicks for click-based achievements.
    pub fn record_clicks(&mut self, clicks: u32) {
        self.click_count = Some(self.click_count.unwrap_or(0).saturating_add(clicks));
        self.refresh_achievements();
    }

    #[must_use]
    pub fn total_alcohol(&self) -> f64 {
        self.records.iter().map(|r| r.alcohol_grams).sum()
    }

    #[must_use]
    pub fn current_bac(&self) -> f64 {
        self.character.peak_bac(self.total_alcohol())
    }

    /// Highest BAC over every prefix of the current record list.
    #[must_use]
    pub fn max_bac(&self) -> f64 {
        self.max_bac
    }

    #[must_use]
    pub fn drinks_count(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn drink_counts(&self) -> BTreeMap<String, u32> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.drink_id.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Catalog entry for the most recent drink, if any.
    #[must_use]
    pub fn last_drink(&self) -> Option<&Drink> {
        self.records
            .last()
            .and_then(|record| self.catalog.get(&record.drink_id))
    }

    #[must_use]
    pub fn organ_states(&self) -> Vec<OrganState> {
        all_organ_states(self.current_bac())
    }

    #[must_use]
    pub fn sober_hours(&self) -> f64 {
        self.character.time_to_sober(self.current_bac())
    }

    #[must_use]
    pub fn sober_eta(&self) -> SoberEta {
        SoberEta::from_hours(self.sober_hours())
    }

    #[must_use]
    pub fn achievement_stats(&self) -> AchievementStats {
        AchievementStats {
            total_alcohol: self.total_alcohol(),
            max_bac: self.max_bac,
            drinks_count: u32::try_from(self.records.len()).unwrap_or(u32::MAX),
            drink_types: self.records.iter().map(|r| r.drink_id.clone()).collect(),
            click_count: self.click_count,
        }
    }

    /// Check the bundled achievements against current stats; newly unlocked
    /// ids are appended and queued for display. Returns the new ids.
    pub fn refresh_achievements(&mut self) -> Vec<String> {
        let stats = self.achievement_stats();
        let fresh: Vec<String> = AchievementCatalog::default_catalog()
            .check(&stats, &self.unlocked)
            .into_iter()
            .map(|achievement| achievement.id.clone())
            .collect();
        for id in &fresh {
            log::info!(target: LOG_ACHIEVEMENTS, "unlocked {id}");
        }
        self.unlocked.extend(fresh.iter().cloned());
        self.pending.extend(fresh.iter().cloned());
        fresh
    }

    /// Pop the next unlocked achievement waiting to be shown.
    pub fn next_unlocked(&mut self) -> Option<String> {
        self.pending.pop_front()
    }

    #[must_use]
    pub fn unlocked(&self) -> &[String] {
        &self.unlocked
    }

    /// Consume the session, keeping only its unlocked ids.
    #[must_use]
    pub fn into_unlocked(self) -> Vec<String> {
        self.unlocked
    }

    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            verdict: Verdict::for_max_bac(self.max_bac),
            drinks_count: self.records.len(),
            total_alcohol: self.total_alcohol(),
            max_bac: self.max_bac,
            current_bac: self.current_bac(),
            sober_eta: self.sober_eta(),
            drink_counts: self.drink_counts(),
            organs: all_organ_states(self.max_bac),
            tips: health_tips(self.max_bac, &self.character),
            unlocked: self.unlocked.clone(),
        }
    }

    fn recompute(&mut self) {
        let mut running = 0.0;
        let mut peak: f64 = 0.0;
        for record in &self.records {
            running += record.alcohol_grams;
            peak = peak.max(self.character.peak_bac(running));
        }
        self.max_bac = peak;
        self.refresh_achievements();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{CharacterProfile, Sex};

    fn session() -> DrinkingSession {
        let character = Character::new(CharacterProfile {
            sex: Sex::Male,
            weight_kg: 70.0,
            age: 30,
            ..CharacterProfile::default()
        })
        .unwrap();
        DrinkingSession::new(character)
    }

    #[test]
    fn unknown_drink_is_a_no_op() {
        let mut session = session();
        assert!(session.drink("absinthe", 0).is_none());
        assert_eq!(session.drinks_count(), 0);
        assert!(session.unlocked().is_empty());
    }

    #[test]
    fn aggregates_follow_records() {
        let mut session = session();
        session.drink("beer", 0).unwrap();
        session.drink("baijiu", 1_000).unwrap();
        let expected: f64 = session.records().iter().map(|r| r.alcohol_grams).sum();
        assert!((session.total_alcohol() - expected).abs() < 1e-9);
        assert!((session.max_bac() - session.current_bac()).abs() < 1e-12);
        assert_eq!(session.drink_counts().get("beer"), Some(&1));
        assert_eq!(session.last_drink().map(|d| d.id.as_str()), Some("baijiu"));
    }

    #[test]
    fn watermark_drops_when_records_are_removed() {
        let mut session = session();
        session.drink("beer", 0);
        let one = session.max_bac();
        session.drink("whiskey", 1);
        assert!(session.max_bac() > one);

        let removed = session.undo_last().unwrap();
        assert_eq!(removed.drink_id, "whiskey");
        assert!((session.max_bac() - one).abs() < 1e-12);
        assert!(session.remove(5).is_none());
        session.remove(0);
        assert!(session.max_bac().abs() < f64::EPSILON);
    }

    #[test]
    fn achievements_queue_in_catalog_order() {
        let mut session = session();
        session.drink("long-island", 0);
        assert_eq!(session.next_unlocked().as_deref(), Some("first_drop"));
        assert_eq!(session.next_unlocked().as_deref(), Some("tipsy"));
        assert_eq!(session.next_unlocked().as_deref(), Some("one_shot"));
        assert_eq!(session.next_unlocked(), None);

        session.drink("beer", 10);
        session.undo_last();
        assert_eq!(session.next_unlocked(), None);
        assert_eq!(session.unlocked().len(), 3);

        session.undo_last();
        assert_eq!(session.next_unlocked().as_deref(), Some("zero_drinks"));
    }

    #[test]
    fn summary_uses_peak_for_verdict_and_organs() {
        let mut session = session();
        for ts in 0..4 {
            session.drink("whiskey", ts);
        }
        let summary = session.summary();
        assert_eq!(summary.drinks_count, 4);
        assert_eq!(summary.verdict, Verdict::for_max_bac(summary.max_bac));
        assert_eq!(summary.organs.len(), 5);
        assert_eq!(summary.organs, all_organ_states(summary.max_bac));
        assert_eq!(summary.unlocked, session.unlocked());
        assert!(summary.tips.last().is_some_and(|tip| tip.contains("WHO")));
    }
}
