//! World model and configuration shared across the bot.
//!
//! `game-core` defines the decoded snapshot types produced by the memory reader,
//! the static map metadata keyed by session seed, and the per-session
//! configuration. It performs no I/O; the runtime and loader crates depend on
//! the types re-exported here.
pub mod config;
pub mod error;
pub mod layout;
pub mod map;
pub mod state;

pub use config::{
    BaalConfig, BotConfig, CharacterClass, CharacterConfig, CompanionConfig, Difficulty,
    GameSettings, HealthConfig, TimingConfig,
};
pub use error::{ConfigError, ParseIdError};
pub use layout::Offsets;
pub use map::{AreaMap, MapData};
pub use state::{
    AdjacentLevel, Anomaly, Area, CollisionGrid, Corpse, HoverData, Item, ItemFlags, ItemId,
    ItemLocation, ItemQuality, KeyBinding, KeyBindings, Monster, MonsterFilter, MonsterType,
    Monsters, NpcId, NpcPlacement, Object, ObjectId, Objects, OpenMenus, PlayerUnit, Position,
    STAT_TABLE, SkillId, Stat, StatDescriptor, StatEncoding, StatKind, Stats, UnitId, UnitKind,
    WorldSnapshot,
};
