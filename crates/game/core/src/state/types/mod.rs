pub mod area;
pub mod common;
pub mod item;
pub mod monster;
pub mod object;
pub mod player;
pub mod stat;
pub mod ui;

// Re-export identifiers and geometry
pub use common::{Position, UnitId, UnitKind};

// Re-export area layout types
pub use area::{AdjacentLevel, Area, CollisionGrid, NpcPlacement};

// Re-export unit records
pub use item::{Item, ItemFlags, ItemId, ItemLocation, ItemQuality};
pub use monster::{Monster, MonsterFilter, MonsterType, Monsters, NpcId};
pub use object::{Object, ObjectId, Objects};
pub use player::{KeyBinding, KeyBindings, PlayerUnit, SkillId};

// Re-export stat decoding types
pub use stat::{STAT_TABLE, Stat, StatDescriptor, StatEncoding, StatKind, Stats};

// Re-export UI state
pub use ui::{Corpse, HoverData, OpenMenus};
