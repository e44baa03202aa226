//! Decoded world state.
//!
//! Types here describe what the reader extracts from game memory in one tick.
//! Everything is plain data: the reader builds a [`WorldSnapshot`] and the
//! runs only ever read it.
mod snapshot;
pub mod types;

pub use snapshot::{Anomaly, WorldSnapshot};
pub use types::{
    AdjacentLevel, Area, CollisionGrid, Corpse, HoverData, Item, ItemFlags, ItemId, ItemLocation,
    ItemQuality, KeyBinding, KeyBindings, Monster, MonsterFilter, MonsterType, Monsters, NpcId,
    NpcPlacement, Object, ObjectId, Objects, OpenMenus, PlayerUnit, Position, STAT_TABLE,
    SkillId, Stat, StatDescriptor, StatEncoding, StatKind, Stats, UnitId, UnitKind,
};
