//! Screen-to-screen flow for one player.
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::character::Character;
use crate::constants::LOG_SESSION;
use crate::reaction::ReactionGame;
use crate::result::SessionSummary;
use crate::session::DrinkingSession;
use crate::story::{StoryEngine, StoryGraphError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    AgeGate,
    Character,
    ModeSelect,
    Drinking,
    Reaction,
    Result,
    Story,
}

impl Screen {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::AgeGate => "age_gate",
            Self::Character => "character",
            Self::ModeSelect => "mode_select",
            Self::Drinking => "drinking",
            Self::Reaction => "reaction",
            Self::Result => "result",
            Self::Story => "story",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    Quick,
    Story,
    LongTerm,
}

impl GameMode {
    pub const ALL: [Self; 3] = [Self::Quick, Self::Story, Self::LongTerm];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Quick => "quick",
            Self::Story => "story",
            Self::LongTerm => "long_term",
        }
    }

    /// Long-term mode is listed on the menu but cannot be entered yet.
    #[must_use]
    pub const fn is_available(self) -> bool {
        !matches!(self, Self::LongTerm)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("cannot {action} from the {screen} screen")]
    WrongScreen { action: &'static str, screen: Screen },
    #[error("mode `{}` is not available", .0.key())]
    ModeUnavailable(GameMode),
    #[error("no character has been created")]
    NoCharacter,
    #[error(transparent)]
    Story(#[from] StoryGraphError),
}

/// Owns everything one player touches between the age gate and the result screen.
#[derive(Debug, Default)]
pub struct SessionFlow {
    screen: Screen,
    session: Option<DrinkingSession>,
    story: Option<StoryEngine>,
    reaction: Option<ReactionGame>,
    summary: Option<SessionSummary>,
    unlocked: Vec<String>,
}

impl SessionFlow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[must_use]
    pub fn session(&self) -> Option<&DrinkingSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut DrinkingSession> {
        self.session.as_mut()
    }

    pub fn story_mut(&mut self) -> Option<&mut StoryEngine> {
        self.story.as_mut()
    }

    pub fn reaction_mut(&mut self) -> Option<&mut ReactionGame> {
        self.reaction.as_mut()
    }

    #[must_use]
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    /// # Errors
    ///
    /// Fails unless on the age gate.
    pub fn confirm_age(&mut self) -> Result<(), FlowError> {
        self.expect(Screen::AgeGate, "confirm age")?;
        self.go(Screen::Character);
        Ok(())
    }

    /// # Errors
    ///
    /// Fails unless on character creation.
    pub fn create_character(&mut self, character: Character) -> Result<(), FlowError> {
        self.expect(Screen::Character, "create a character")?;
        let unlocked = std::mem::take(&mut self.unlocked);
        self.session = Some(DrinkingSession::new(character).with_unlocked(unlocked));
        self.go(Screen::ModeSelect);
        Ok(())
    }

    /// # Errors
    ///
    /// Fails off the mode-select screen, for unavailable modes, or when the
    /// bundled story does not validate.
    pub fn select_mode(&mut self, mode: GameMode) -> Result<(), FlowError> {
        self.expect(Screen::ModeSelect, "select a mode")?;
        if !mode.is_available() {
            return Err(FlowError::ModeUnavailable(mode));
        }
        match mode {
            GameMode::Story => {
                self.story = Some(StoryEngine::with_default_graph()?);
                self.go(Screen::Story);
            }
            GameMode::Quick | GameMode::LongTerm => self.go(Screen::Drinking),
        }
        Ok(())
    }

    /// Leave the story for the mode menu.
    ///
    /// # Errors
    ///
    /// Fails unless in story mode.
    pub fn leave_story(&mut self) -> Result<(), FlowError> {
        self.expect(Screen::Story, "leave the story")?;
        self.story = None;
        self.go(Screen::ModeSelect);
        Ok(())
    }

    /// Open the reaction game at the session's current BAC.
    ///
    /// # Errors
    ///
    /// Fails unless on the drinking screen.
    pub fn open_reaction(&mut self, seed: u64) -> Result<(), FlowError> {
        self.expect(Screen::Drinking, "open the reaction game")?;
        let bac = self.session.as_ref().map_or(0.0, DrinkingSession::current_bac);
        self.reaction = Some(ReactionGame::seeded(bac, seed));
        self.go(Screen::Reaction);
        Ok(())
    }

    /// Back to drinking; clicks from the game count toward achievements.
    ///
    /// # Errors
    ///
    /// Fails unless in the reaction game.
    pub fn close_reaction(&mut self) -> Result<(), FlowError> {
        self.expect(Screen::Reaction, "close the reaction game")?;
        if let Some(game) = self.reaction.take() {
            let clicks = game.total_hits();
            if let Some(session) = self.session.as_mut()
                && clicks > 0
            {
                session.record_clicks(clicks);
            }
        }
        self.go(Screen::Drinking);
        Ok(())
    }

    /// Final achievement check and summary.
    ///
    /// # Errors
    ///
    /// Fails unless on the drinking screen with a character.
    pub fn finish(&mut self) -> Result<&SessionSummary, FlowError> {
        self.expect(Screen::Drinking, "finish drinking")?;
        let session = self.session.as_mut().ok_or(FlowError::NoCharacter)?;
        session.refresh_achievements();
        let summary = session.summary();
        self.go(Screen::Result);
        Ok(self.summary.insert(summary))
    }

    /// Drop the character and records and go back to character creation.
    /// Unlocked achievements carry over.
    pub fn restart(&mut self) {
        if let Some(session) = self.session.take() {
            self.unlocked = session.into_unlocked();
        }
        self.story = None;
        self.reaction = None;
        self.summary = None;
        self.go(Screen::Character);
    }

    fn expect(&self, screen: Screen, action: &'static str) -> Result<(), FlowError> {
        if self.screen == screen {
            Ok(())
        } else {
            Err(FlowError::WrongScreen {
                action,
                screen: self.screen,
            })
        }
    }

    fn go(&mut self, screen: Screen) {
        log::debug!(target: LOG_SESSION, "{} -> {}", self.screen, screen);
        self.screen = screen;
    }
}
