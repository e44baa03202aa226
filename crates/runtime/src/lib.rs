//! Session runtime for the memory-backed game bot.
//!
//! This crate turns raw game memory into [`game_core::WorldSnapshot`]s and
//! drives scripted runs against them. Consumers build a [`SessionContext`],
//! hand it to a [`Bot`], and run one or more bots under a [`Supervisor`].
//!
//! Modules are organized by responsibility:
//! - [`memory`] reads and decodes game memory into snapshots
//! - [`api`] exposes the seams implemented outside the crate
//! - [`steps`] holds small reusable actions (skill switch, cleanse, interact)
//! - [`character`] and [`runs`] hold class combat and run scripts
//! - [`bot`] and [`supervisor`] own the session lifecycle
//! - [`health`] watches life and mana while runs execute
//! - [`testing`] provides in-memory fakes of every seam
pub mod api;
pub mod bot;
pub mod character;
pub mod context;
pub mod health;
pub mod memory;
pub mod runs;
pub mod steps;
pub mod supervisor;
pub mod testing;

pub use api::{
    ActionError, Actions, BotError, CatalogError, CharacterError, ContextError, GameReader,
    InputError, InputSink, RunError, StepError,
};
pub use bot::{Bot, RunReport, SessionReport};
pub use character::{BlizzardSorceress, Character, Hammerdin, WaveContingency, build_character};
pub use context::{SessionContext, SessionContextBuilder};
pub use health::{HealthBreach, HealthMonitor, Resource};
pub use memory::{
    DumpMemorySource, FileMapService, MapError, MemoryError, MemoryImage, MemorySource,
    ReaderError, StateReader, StaticMapService, SyntheticGame,
};
pub use runs::{Baal, Run, RunKind, build_runs, parse_runs};
pub use steps::{InteractPolicy, PoisonCleanse, interact_object, set_skill, set_skill_with};
pub use supervisor::{Supervisor, SupervisorError};
