//! Error types surfaced by steps, characters, runs and the session loop.
//!
//! Each layer wraps the one below so callers can tell a configuration gap
//! from a navigation failure or a lost session without string matching.
use std::time::Duration;

use game_core::{NpcId, ObjectId, SkillId};
use thiserror::Error;

pub use super::actions::ActionError;
pub use super::input::InputError;
pub use crate::health::HealthBreach;
pub use crate::memory::ReaderError;

#[derive(Debug, Error)]
pub enum StepError {
    #[error("no key binding configured for skill {skill}")]
    MissingBinding { skill: SkillId },

    #[error("{object} not found")]
    ObjectNotFound { object: ObjectId },

    #[error("interaction with {object} did not complete after {attempts} attempts")]
    InteractionFailed { object: ObjectId, attempts: u32 },

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Reader(#[from] ReaderError),
}

#[derive(Debug, Error)]
pub enum CharacterError {
    #[error("{boss} is not visible")]
    BossNotFound { boss: NpcId },

    #[error(transparent)]
    Step(#[from] StepError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Reader(#[from] ReaderError),
}

#[derive(Debug, Error)]
pub enum RunError {
    /// An abort identity was seen at the encounter; the run refused to engage.
    #[error("guard condition: {found} present, skipping encounter")]
    GuardTriggered { found: NpcId },

    /// Travel or positioning failed; propagated verbatim.
    #[error(transparent)]
    Navigation(#[from] ActionError),

    #[error("no wave activity for {0:?}")]
    WaveTimeout(Duration),

    /// Life or mana fell below its floor; the run was abandoned mid-step.
    #[error("{0}")]
    LowHealth(HealthBreach),

    #[error(transparent)]
    Step(#[from] StepError),

    #[error(transparent)]
    Character(#[from] CharacterError),

    #[error(transparent)]
    Reader(#[from] ReaderError),
}

impl RunError {
    /// True when the failure means the game session is gone.
    pub fn is_detached(&self) -> bool {
        matches!(
            self,
            RunError::Reader(ReaderError::NotAttached)
                | RunError::Step(StepError::Reader(ReaderError::NotAttached))
                | RunError::Character(CharacterError::Reader(ReaderError::NotAttached))
                | RunError::Character(CharacterError::Step(StepError::Reader(
                    ReaderError::NotAttached
                )))
        )
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unknown run `{0}`")]
    UnknownRun(String),
}

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("session context requires {0} to be configured before building")]
    Missing(&'static str),
}

#[derive(Debug, Error)]
pub enum BotError {
    #[error("game did not attach within {0:?}")]
    AttachTimeout(Duration),

    #[error("session detached during run {run}")]
    Detached { run: String },

    #[error(transparent)]
    Reader(#[from] ReaderError),
}
