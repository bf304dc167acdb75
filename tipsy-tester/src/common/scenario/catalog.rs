use anyhow::{Context, Result, ensure};
use rand::Rng;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use std::fmt::Write as _;

use super::{IterationOutcome, TestScenario};
use tipsy_game::constants::{MAX_AGE, MIN_AGE, REACTION_ROUND_SECS};
use tipsy_game::reaction::target_lifetime_ms;
use tipsy_game::{
    AchievementCatalog, Character, CharacterProfile, DrinkCatalog, DrinkingSession, GameMode,
    Organ, ReactionGame, ReactionPhase, Screen, SessionFlow, Sex, StoryEngine, Verdict,
    organ_status,
};

const MAX_STORY_STEPS: usize = 200;
const MAX_SESSION_OPS: u32 = 14;
const TICK_MS: u64 = 50;
const EPSILON: f64 = 1e-12;

pub fn catalog_scenarios() -> Vec<TestScenario> {
    vec![
        TestScenario::new(
            "smoke",
            "Smoke Test",
            "Age gate to result screen with a few drinks and a reaction test",
            smoke,
        ),
        TestScenario::new(
            "story-walk",
            "Story Walk",
            "Random walk over available choices until an ending",
            story_walk,
        ),
        TestScenario::new(
            "drinking-session",
            "Drinking Session",
            "Random drinks and removals against recomputed aggregates",
            drinking_session,
        ),
        TestScenario::new(
            "achievement-bookkeeping",
            "Achievement Bookkeeping",
            "Unlocks are unique, queued once and match the catalog",
            achievement_bookkeeping,
        ),
        TestScenario::new(
            "reaction-rounds",
            "Reaction Rounds",
            "Sober and drunk rounds with a simulated player",
            reaction_rounds,
        ),
    ]
}

fn random_character(rng: &mut ChaCha20Rng) -> Result<Character> {
    let profile = CharacterProfile {
        sex: if rng.gen_bool(0.5) { Sex::Male } else { Sex::Female },
        weight_kg: f64::from(rng.gen_range(45_u32..=110)),
        age: rng.gen_range(MIN_AGE..=MAX_AGE),
        fasting: rng.gen_bool(0.3),
        ..CharacterProfile::default()
    };
    Character::new(profile).context("generated profile was rejected")
}

fn random_drink_id(rng: &mut ChaCha20Rng) -> Result<String> {
    DrinkCatalog::default_catalog()
        .drinks
        .choose(rng)
        .map(|drink| drink.id.clone())
        .context("bundled drink catalog is empty")
}

fn smoke(seed: u64) -> Result<IterationOutcome> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut transcript = String::new();

    let mut flow = SessionFlow::new();
    flow.confirm_age()?;
    flow.create_character(random_character(&mut rng)?)?;
    flow.select_mode(GameMode::Quick)?;

    let session = flow.session_mut().context("no session after character creation")?;
    for minute in 0..3_u64 {
        let id = random_drink_id(&mut rng)?;
        session
            .drink(&id, minute * 60_000)
            .with_context(|| format!("catalog drink `{id}` was rejected"))?;
        write!(transcript, "{id};")?;
    }

    flow.open_reaction(seed)?;
    flow.close_reaction()?;
    let summary = flow.finish()?.clone();

    ensure!(flow.screen() == Screen::Result, "finish should land on the result screen");
    ensure!(summary.drinks_count == 3, "expected 3 drinks, got {}", summary.drinks_count);
    ensure!(
        summary.verdict == Verdict::for_max_bac(summary.max_bac),
        "verdict {:?} does not match peak {:.4}",
        summary.verdict,
        summary.max_bac
    );
    ensure!(summary.tips.len() >= 3, "expected at least 3 tips");
    ensure!(
        summary.unlocked.iter().any(|id| id == "first_drop"),
        "first drink should unlock first_drop"
    );
    write!(transcript, "max={:.6}", summary.max_bac)?;

    Ok(IterationOutcome {
        detail: format!(
            "{} drinks, peak {:.3}%, {}",
            summary.drinks_count,
            summary.max_bac * 100.0,
            summary.verdict.title()
        ),
        transcript,
    })
}

fn story_walk(seed: u64) -> Result<IterationOutcome> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut engine = StoryEngine::with_default_graph()?;
    let mut transcript = engine.current_id().to_string();

    for _ in 0..MAX_STORY_STEPS {
        if engine.is_ending() {
            break;
        }

        if let Some(blocked) = engine.choices().into_iter().find(|choice| !choice.available) {
            let before = engine.stats().clone();
            let node = engine.current_id().to_string();
            ensure!(
                engine.choose(blocked.index).is_err(),
                "guarded choice {} at `{node}` was accepted",
                blocked.index
            );
            ensure!(
                engine.stats() == &before && engine.current_id() == node,
                "rejected choice changed state at `{node}`"
            );
        }

        let options = engine.available_choices();
        let index = *options
            .choose(&mut rng)
            .with_context(|| format!("dead end at `{}`", engine.current_id()))?;
        let before = engine.stats().clone();
        let transition = engine.choose(index)?;
        ensure!(
            engine.stats() == &before.merged(transition.patch.clone()),
            "stats at `{}` are not the merge of the previous stats and the patch",
            transition.to
        );
        ensure!(engine.stats().bac >= 0.0, "story BAC went negative");
        write!(transcript, ">{}", transition.to)?;
    }

    ensure!(
        engine.is_ending(),
        "no ending within {MAX_STORY_STEPS} steps (at `{}`)",
        engine.current_id()
    );
    let ending = engine
        .ending()
        .with_context(|| format!("terminal `{}` has no ending", engine.current_id()))?;
    ensure!(
        engine.history().len() == engine.steps(),
        "history length disagrees with step count"
    );

    Ok(IterationOutcome {
        detail: format!("{} steps -> {} ({})", engine.steps(), ending.title, ending.tier),
        transcript,
    })
}

fn drinking_session(seed: u64) -> Result<IterationOutcome> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut session = DrinkingSession::new(random_character(&mut rng)?);
    let mut transcript = String::new();
    let ops = rng.gen_range(1..=MAX_SESSION_OPS);

    for step in 0..ops {
        if session.drinks_count() > 0 && rng.gen_bool(0.25) {
            let index = rng.gen_range(0..session.drinks_count());
            let removed = session.remove(index).context("in-range removal returned nothing")?;
            write!(transcript, "-{}@{index};", removed.drink_id)?;
        } else {
            let id = random_drink_id(&mut rng)?;
            session
                .drink(&id, u64::from(step) * 60_000)
                .with_context(|| format!("catalog drink `{id}` was rejected"))?;
            write!(transcript, "+{id};")?;
        }
        check_session_aggregates(&session)?;
    }

    ensure!(
        session.drink("not-a-drink", 0).is_none(),
        "unknown drink ids must be ignored"
    );
    check_session_aggregates(&session)?;
    write!(transcript, "max={:.6}", session.max_bac())?;

    Ok(IterationOutcome {
        detail: format!(
            "{} ops, {} drinks, peak {:.3}%, sober in {}",
            ops,
            session.drinks_count(),
            session.max_bac() * 100.0,
            session.sober_eta()
        ),
        transcript,
    })
}

fn check_session_aggregates(session: &DrinkingSession) -> Result<()> {
    let character = session.character();
    let mut running = 0.0;
    let mut peak: f64 = 0.0;
    for record in session.records() {
        running += record.alcohol_grams;
        peak = peak.max(character.peak_bac(running));
    }

    ensure!(
        (session.total_alcohol() - running).abs() < 1e-9,
        "total alcohol {:.4} != sum of records {running:.4}",
        session.total_alcohol()
    );
    ensure!(
        (session.max_bac() - peak).abs() < EPSILON,
        "peak {:.6} != prefix maximum {peak:.6}",
        session.max_bac()
    );
    ensure!(
        session.current_bac() <= session.max_bac() + EPSILON,
        "current BAC above the peak"
    );
    let counted: u32 = session.drink_counts().values().sum();
    ensure!(
        counted as usize == session.drinks_count(),
        "per-drink counts do not add up"
    );
    ensure!(session.sober_hours() >= 0.0, "negative time to sober");
    for organ in Organ::ALL {
        ensure!(
            organ_status(session.current_bac(), organ).tier()
                <= organ_status(session.max_bac(), organ).tier(),
            "{organ} is worse now than at the peak"
        );
    }
    Ok(())
}

fn achievement_bookkeeping(seed: u64) -> Result<IterationOutcome> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut session = DrinkingSession::new(random_character(&mut rng)?);
    let mut queued = Vec::new();
    let mut transcript = String::new();

    for step in 0..rng.gen_range(1..=MAX_SESSION_OPS) {
        match rng.gen_range(0..10) {
            0..=5 => {
                let id = random_drink_id(&mut rng)?;
                session.drink(&id, u64::from(step) * 60_000);
                write!(transcript, "+{id};")?;
            }
            6 | 7 => {
                if let Some(removed) = session.undo_last() {
                    write!(transcript, "-{};", removed.drink_id)?;
                }
            }
            _ => {
                let clicks = rng.gen_range(1..=30);
                session.record_clicks(clicks);
                write!(transcript, "*{clicks};")?;
            }
        }
        while let Some(id) = session.next_unlocked() {
            queued.push(id);
        }
    }

    // An undo on an empty session changes nothing and skips the check.
    session.refresh_achievements();
    while let Some(id) = session.next_unlocked() {
        queued.push(id);
    }

    let unlocked = session.unlocked().to_vec();
    ensure!(queued == unlocked, "queue order {queued:?} != unlocked {unlocked:?}");

    let mut sorted = unlocked.clone();
    sorted.sort();
    sorted.dedup();
    ensure!(sorted.len() == unlocked.len(), "duplicate unlocks in {unlocked:?}");

    let catalog = AchievementCatalog::default_catalog();
    for id in &unlocked {
        ensure!(catalog.get(id).is_some(), "unlocked `{id}` is not in the catalog");
    }

    let stats = session.achievement_stats();
    for achievement in &catalog.achievements {
        if achievement.condition.holds(&stats) {
            ensure!(
                unlocked.contains(&achievement.id),
                "`{}` holds for the current stats but was never unlocked",
                achievement.id
            );
        }
    }
    ensure!(
        session.refresh_achievements().is_empty(),
        "a repeated check unlocked something new"
    );
    write!(transcript, "unlocked={}", unlocked.join(","))?;

    Ok(IterationOutcome {
        detail: format!("{} unlocked: {}", unlocked.len(), unlocked.join(", ")),
        transcript,
    })
}

fn reaction_rounds(seed: u64) -> Result<IterationOutcome> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let bac = rng.gen_range(0.0..0.3);
    let mut game = ReactionGame::seeded(bac, seed);
    let mut transcript = format!("bac={bac:.6};");
    let mut now = 0;

    for expected in [ReactionPhase::SoberTest, ReactionPhase::DrunkTest] {
        ensure!(game.start_round(now), "could not start the {expected:?} round");
        ensure!(game.phase() == expected, "expected {expected:?}, got {:?}", game.phase());
        let round_end = now + u64::from(REACTION_ROUND_SECS) * 1_000;
        let mut planned: Option<(u64, u64)> = None;

        while game.is_running() {
            now += TICK_MS;
            game.advance(now);
            let Some(target) = game.target().copied() else {
                continue;
            };
            ensure!(
                (0.0..=100.0).contains(&target.x) && (0.0..=100.0).contains(&target.y),
                "target placed off the field at ({:.1}, {:.1})",
                target.x,
                target.y
            );
            let hit_at = match planned {
                Some((shown, at)) if shown == target.shown_at_ms => at,
                _ => {
                    let at = target.shown_at_ms + rng.gen_range(200..=900);
                    planned = Some((target.shown_at_ms, at));
                    at
                }
            };
            if now >= hit_at
                && let Some(reaction) = game.hit(now)
            {
                write!(transcript, "{reaction},")?;
            }
            ensure!(now <= round_end + TICK_MS, "round overran its {REACTION_ROUND_SECS} s");
        }
        transcript.push(';');
    }

    ensure!(game.phase() == ReactionPhase::Result, "both rounds should end on the result");
    ensure!(!game.start_round(now), "a third round must not start");
    let comparison = game.comparison().context("no comparison after the drunk round")?;

    let sober_lifetime = u64::from(target_lifetime_ms(None));
    let drunk_lifetime = u64::from(target_lifetime_ms(Some(bac)));
    ensure!(drunk_lifetime <= sober_lifetime, "drunk targets outlive sober ones");

    for (round, lifetime) in [
        (&comparison.sober, sober_lifetime),
        (&comparison.drunk, drunk_lifetime),
    ] {
        ensure!(round.hits <= round.shown, "more hits than targets");
        ensure!(
            round.reaction_times_ms.len() == round.hits as usize,
            "one reaction time per hit"
        );
        ensure!(
            round
                .reaction_times_ms
                .iter()
                .all(|ms| u64::from(*ms) < lifetime),
            "a hit landed after its target expired"
        );
        ensure!((0.0..=1.0).contains(&round.accuracy()), "accuracy out of range");
    }
    ensure!(
        game.total_hits() == comparison.sober.hits + comparison.drunk.hits,
        "total hits disagree with the rounds"
    );

    Ok(IterationOutcome {
        detail: format!(
            "bac {:.3}%: sober {}/{} drunk {}/{}, decline {}",
            bac * 100.0,
            comparison.sober.hits,
            comparison.sober.shown,
            comparison.drunk.hits,
            comparison.drunk.shown,
            comparison
                .decline_percent()
                .map_or_else(|| "n/a".to_string(), |pct| format!("{pct}%"))
        ),
        transcript,
    })
}
