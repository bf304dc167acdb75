//! Reaction mini-game: a sober round followed by a drunk round at the
//! session's BAC, compared side by side.
//!
//! The game is driven by caller-supplied millisecond timestamps; it owns no
//! timers. Call [`ReactionGame::advance`] with the current time to expire
//! targets and spawn new ones.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DRUNK_HIT_RESPAWN_MS, DRUNK_LIFETIME_BAC_SCALE, DRUNK_RESPAWN_MS,
    DRUNK_TARGET_MIN_LIFETIME_MS, FIRST_SPAWN_DELAY_MS, JITTER_BAC_SCALE, JITTER_CLAMP_X,
    JITTER_CLAMP_Y, REACTION_ROUND_SECS, SHAKE_BAC, SHAKE_MIN_PERIOD_SECS,
    SHAKE_PERIOD_BAC_SCALE, SOBER_HIT_RESPAWN_MS, SOBER_RESPAWN_MS, TARGET_LIFETIME_MS,
    TARGET_MIN_X, TARGET_MIN_Y, TARGET_SPAN_X, TARGET_SPAN_Y,
};
use crate::numbers::{round_f64_to_i32, round_f64_to_u32, usize_to_f64};

const MS_PER_SEC: u64 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReactionPhase {
    #[default]
    Ready,
    SoberTest,
    DrunkTest,
    Result,
}

/// A clickable target, positioned in percent of the play field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub x: f64,
    pub y: f64,
    pub shown_at_ms: u64,
    pub expires_at_ms: u64,
}

/// Target position. `drunk_bac` adds the same jitter to both axes before clamping.
pub fn place_target<R: Rng>(rng: &mut R, drunk_bac: Option<f64>) -> (f64, f64) {
    let x = TARGET_MIN_X + rng.gen_range(0.0..1.0) * TARGET_SPAN_X;
    let y = TARGET_MIN_Y + rng.gen_range(0.0..1.0) * TARGET_SPAN_Y;
    match drunk_bac {
        None => (x, y),
        Some(bac) => {
            let jitter = (rng.gen_range(0.0..1.0) - 0.5) * bac * JITTER_BAC_SCALE;
            (
                (x + jitter).clamp(JITTER_CLAMP_X.0, JITTER_CLAMP_X.1),
                (y + jitter).clamp(JITTER_CLAMP_Y.0, JITTER_CLAMP_Y.1),
            )
        }
    }
}

/// How long a target stays up.
#[must_use]
pub fn target_lifetime_ms(drunk_bac: Option<f64>) -> u32 {
    match drunk_bac {
        None => TARGET_LIFETIME_MS,
        Some(bac) => round_f64_to_u32(
            (f64::from(TARGET_LIFETIME_MS) - bac * DRUNK_LIFETIME_BAC_SCALE)
                .max(DRUNK_TARGET_MIN_LIFETIME_MS),
        ),
    }
}

/// Delay before the next target, after a timeout or after a hit.
pub fn respawn_delay_ms<R: Rng>(rng: &mut R, drunk: bool, after_hit: bool) -> u32 {
    let (base, spread) = match (drunk, after_hit) {
        (true, true) => DRUNK_HIT_RESPAWN_MS,
        (true, false) => DRUNK_RESPAWN_MS,
        (false, true) => SOBER_HIT_RESPAWN_MS,
        (false, false) => SOBER_RESPAWN_MS,
    };
    base + rng.gen_range(0..spread)
}

/// Cursor shake period in seconds, or `None` when steady.
#[must_use]
pub fn shake_period(bac: f64) -> Option<f64> {
    (bac > SHAKE_BAC).then(|| (1.0 - bac * SHAKE_PERIOD_BAC_SCALE).max(SHAKE_MIN_PERIOD_SECS))
}

/// Tally for one timed round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ReactionRound {
    pub hits: u32,
    pub shown: u32,
    pub reaction_times_ms: Vec<u32>,
}

impl ReactionRound {
    /// Rounded mean reaction time; `None` with no hits.
    #[must_use]
    pub fn average_reaction_ms(&self) -> Option<u32> {
        if self.reaction_times_ms.is_empty() {
            return None;
        }
        let total: f64 = self.reaction_times_ms.iter().copied().map(f64::from).sum();
        Some(round_f64_to_u32(
            total / usize_to_f64(self.reaction_times_ms.len()),
        ))
    }

    /// Fraction of shown targets that were hit.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        if self.shown == 0 {
            0.0
        } else {
            f64::from(self.hits) / f64::from(self.shown)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionComparison {
    pub sober: ReactionRound,
    pub drunk: ReactionRound,
}

impl ReactionComparison {
    /// Score drop from sober to drunk in percent, floored at zero.
    /// `None` when the sober round scored nothing.
    #[must_use]
    pub fn decline_percent(&self) -> Option<u32> {
        if self.sober.hits == 0 {
            return None;
        }
        let ratio = f64::from(self.drunk.hits) / f64::from(self.sober.hits);
        let decline = round_f64_to_i32((1.0 - ratio) * 100.0).max(0);
        Some(decline.unsigned_abs())
    }
}

/// Two-round reaction test at a fixed BAC.
#[derive(Debug, Clone)]
pub struct ReactionGame<R = ChaCha20Rng> {
    bac: f64,
    rng: R,
    phase: ReactionPhase,
    running: bool,
    round_ends_ms: u64,
    round: ReactionRound,
    sober: Option<ReactionRound>,
    drunk: Option<ReactionRound>,
    target: Option<Target>,
    next_spawn_ms: Option<u64>,
}

impl ReactionGame<ChaCha20Rng> {
    #[must_use]
    pub fn seeded(bac: f64, seed: u64) -> Self {
        Self::new(bac, ChaCha20Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> ReactionGame<R> {
    pub fn new(bac: f64, rng: R) -> Self {
        Self {
            bac,
            rng,
            phase: ReactionPhase::Ready,
            running: false,
            round_ends_ms: 0,
            round: ReactionRound::default(),
            sober: None,
            drunk: None,
            target: None,
            next_spawn_ms: None,
        }
    }

    #[must_use]
    pub fn bac(&self) -> f64 {
        self.bac
    }

    #[must_use]
    pub fn phase(&self) -> ReactionPhase {
        self.phase
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    /// Tally of the round in progress (or the last one finished).
    #[must_use]
    pub fn round(&self) -> &ReactionRound {
        &self.round
    }

    #[must_use]
    pub fn sober_round(&self) -> Option<&ReactionRound> {
        self.sober.as_ref()
    }

    /// Hits over finished rounds plus the round in progress.
    #[must_use]
    pub fn total_hits(&self) -> u32 {
        let finished = self.sober.as_ref().map_or(0, |r| r.hits)
            + self.drunk.as_ref().map_or(0, |r| r.hits);
        if self.running {
            finished + self.round.hits
        } else {
            finished
        }
    }

    /// Shake period for the current phase; only the drunk round shakes.
    #[must_use]
    pub fn shake_period(&self) -> Option<f64> {
        if self.phase == ReactionPhase::DrunkTest {
            shake_period(self.bac)
        } else {
            None
        }
    }

    /// Start the next round. Returns `false` if a round is running or the
    /// test is already complete.
    pub fn start_round(&mut self, now_ms: u64) -> bool {
        if self.running {
            return false;
        }
        self.phase = match self.phase {
            ReactionPhase::Ready => ReactionPhase::SoberTest,
            ReactionPhase::DrunkTest if self.sober.is_some() => ReactionPhase::DrunkTest,
            _ => return false,
        };
        self.running = true;
        self.round = ReactionRound::default();
        self.round_ends_ms = now_ms + u64::from(REACTION_ROUND_SECS) * MS_PER_SEC;
        self.target = None;
        self.next_spawn_ms = Some(now_ms + FIRST_SPAWN_DELAY_MS);
        true
    }

    /// Expire and spawn targets up to `now_ms`, and close the round when its time is up.
    pub fn advance(&mut self, now_ms: u64) {
        if !self.running {
            return;
        }
        let drunk = self.drunk_bac();
        loop {
            if let Some(target) = self.target {
                if target.expires_at_ms > now_ms || target.expires_at_ms >= self.round_ends_ms {
                    break;
                }
                self.target = None;
                let delay = respawn_delay_ms(&mut self.rng, drunk.is_some(), false);
                self.next_spawn_ms = Some(target.expires_at_ms + u64::from(delay));
                continue;
            }
            match self.next_spawn_ms {
                Some(at) if at <= now_ms && at < self.round_ends_ms => {
                    let (x, y) = place_target(&mut self.rng, drunk);
                    self.target = Some(Target {
                        x,
                        y,
                        shown_at_ms: at,
                        expires_at_ms: at + u64::from(target_lifetime_ms(drunk)),
                    });
                    self.next_spawn_ms = None;
                    self.round.shown += 1;
                }
                _ => break,
            }
        }
        if now_ms >= self.round_ends_ms {
            self.finish_round();
        }
    }

    /// Register a click on the current target. Returns the reaction time.
    pub fn hit(&mut self, now_ms: u64) -> Option<u32> {
        self.advance(now_ms);
        if !self.running {
            return None;
        }
        let target = self.target.take()?;
        let reaction = u32::try_from(now_ms.saturating_sub(target.shown_at_ms)).unwrap_or(u32::MAX);
        self.round.hits += 1;
        self.round.reaction_times_ms.push(reaction);
        let drunk = self.drunk_bac().is_some();
        let delay = respawn_delay_ms(&mut self.rng, drunk, true);
        self.next_spawn_ms = Some(now_ms + u64::from(delay));
        Some(reaction)
    }

    /// Both rounds, once the drunk round has finished.
    #[must_use]
    pub fn comparison(&self) -> Option<ReactionComparison> {
        Some(ReactionComparison {
            sober: self.sober.clone()?,
            drunk: self.drunk.clone()?,
        })
    }

    fn drunk_bac(&self) -> Option<f64> {
        (self.phase == ReactionPhase::DrunkTest).then_some(self.bac)
    }

    fn finish_round(&mut self) {
        self.running = false;
        self.target = None;
        self.next_spawn_ms = None;
        match self.phase {
            ReactionPhase::SoberTest => {
                self.sober = Some(self.round.clone());
                self.phase = ReactionPhase::DrunkTest;
            }
            ReactionPhase::DrunkTest => {
                self.drunk = Some(self.round.clone());
                self.phase = ReactionPhase::Result;
            }
            ReactionPhase::Ready | ReactionPhase::Result => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sober_placement_stays_in_field() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        for _ in 0..500 {
            let (x, y) = place_target(&mut rng, None);
            assert!((10.0..85.0).contains(&x));
            assert!((10.0..80.0).contains(&y));
        }
    }

    #[test]
    fn drunk_placement_is_clamped() {
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        for _ in 0..500 {
            let (x, y) = place_target(&mut rng, Some(0.4));
            assert!((5.0..=85.0).contains(&x));
            assert!((5.0..=80.0).contains(&y));
        }
    }

    #[test]
    fn lifetimes_and_delays() {
        assert_eq!(target_lifetime_ms(None), 1_000);
        assert_eq!(target_lifetime_ms(Some(0.1)), 800);
        assert_eq!(target_lifetime_ms(Some(0.3)), 600);

        let mut rng = ChaCha20Rng::seed_from_u64(9);
        for _ in 0..200 {
            assert!((1_200..1_600).contains(&respawn_delay_ms(&mut rng, true, false)));
            assert!((1_000..1_300).contains(&respawn_delay_ms(&mut rng, false, false)));
            assert!((500..1_000).contains(&respawn_delay_ms(&mut rng, true, true)));
            assert!((300..600).contains(&respawn_delay_ms(&mut rng, false, true)));
        }
    }

    #[test]
    fn shake_only_above_threshold() {
        assert_eq!(shake_period(0.03), None);
        assert!(shake_period(0.1).is_some_and(|p| (p - 0.7).abs() < 1e-9));
        assert_eq!(shake_period(0.5), Some(0.3));
    }

    #[test]
    fn round_stats() {
        let round = ReactionRound {
            hits: 3,
            shown: 4,
            reaction_times_ms: vec![300, 400, 501],
        };
        assert_eq!(round.average_reaction_ms(), Some(400));
        assert!((round.accuracy() - 0.75).abs() < 1e-9);
        assert_eq!(ReactionRound::default().average_reaction_ms(), None);
        assert!(ReactionRound::default().accuracy().abs() < f64::EPSILON);
    }

    #[test]
    fn decline_is_floored_and_needs_a_sober_score() {
        let round = |hits| ReactionRound {
            hits,
            shown: hits,
            reaction_times_ms: Vec::new(),
        };
        let cmp = |s, d| ReactionComparison {
            sober: round(s),
            drunk: round(d),
        };
        assert_eq!(cmp(10, 7).decline_percent(), Some(30));
        assert_eq!(cmp(4, 6).decline_percent(), Some(0));
        assert_eq!(cmp(0, 3).decline_percent(), None);
    }

    #[test]
    fn full_game_runs_both_rounds() {
        let mut game = ReactionGame::seeded(0.12, 1337);
        assert_eq!(game.phase(), ReactionPhase::Ready);
        assert!(game.start_round(0));
        assert_eq!(game.phase(), ReactionPhase::SoberTest);

        game.advance(499);
        assert!(game.target().is_none());
        game.advance(500);
        let shown = game.target().copied().unwrap();
        assert_eq!(shown.expires_at_ms, 1_500);
        assert_eq!(game.hit(750), Some(250));

        game.advance(15_000);
        assert!(!game.is_running());
        assert_eq!(game.phase(), ReactionPhase::DrunkTest);
        assert_eq!(game.sober_round().map(|r| r.hits), Some(1));
        assert!(game.comparison().is_none());

        assert!(game.start_round(20_000));
        assert!(game.shake_period().is_some());
        game.advance(20_500);
        let drunk_target = game.target().copied().unwrap();
        assert_eq!(drunk_target.expires_at_ms - drunk_target.shown_at_ms, 760);
        game.advance(35_000);

        assert_eq!(game.phase(), ReactionPhase::Result);
        assert!(!game.start_round(40_000));
        let comparison = game.comparison().unwrap();
        assert_eq!(comparison.drunk.hits, 0);
        assert!(comparison.drunk.shown >= 1);
        assert_eq!(comparison.decline_percent(), Some(100));
    }

    #[test]
    fn missed_targets_keep_respawning() {
        let mut game = ReactionGame::seeded(0.0, 5);
        game.start_round(0);
        game.advance(14_999);
        // 500 ms lead-in, then at most one target per 2000 ms cycle
        assert!(game.round().shown >= 6, "{}", game.round().shown);
        assert_eq!(game.round().hits, 0);
        assert!(game.round().average_reaction_ms().is_none());
    }
}
