use std::fmt;

use super::types::{
    AdjacentLevel, Area, CollisionGrid, Corpse, HoverData, Item, Monster, MonsterFilter, Monsters,
    NpcPlacement, Objects, OpenMenus, PlayerUnit, Position, StatKind, UnitId, UnitKind,
};

/// Immutable view of the game world decoded in one polling tick.
///
/// A snapshot is never mutated after the reader builds it. Consumers hold it
/// behind an `Arc` for the duration of a tick and drop it on the next refresh.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldSnapshot {
    pub player: PlayerUnit,
    pub monsters: Monsters,
    /// Static NPC placements of the current area (absolute positions).
    pub npcs: Vec<NpcPlacement>,
    pub items: Vec<Item>,
    pub objects: Objects,
    /// Walkability of the current area in coordinates local to `area_origin`.
    pub collision_grid: CollisionGrid,
    pub area_origin: Position,
    pub adjacent_levels: Vec<AdjacentLevel>,
    pub open_menus: OpenMenus,
    pub corpse: Corpse,
    pub hover: HoverData,
    /// Problems met while decoding this snapshot.
    pub anomalies: Vec<Anomaly>,
}

impl WorldSnapshot {
    pub fn area(&self) -> Area {
        self.player.area
    }

    /// Returns true if the absolute position `at` is walkable in the current area.
    pub fn is_walkable(&self, at: Position) -> bool {
        at.relative_to(self.area_origin)
            .is_some_and(|local| self.collision_grid.is_walkable(local))
    }

    pub fn enemies(&self, filter: &MonsterFilter) -> Vec<&Monster> {
        self.monsters.enemies(filter)
    }

    pub fn is_poisoned(&self) -> bool {
        self.player.is_poisoned()
    }

    pub fn is_clean(&self) -> bool {
        self.anomalies.is_empty()
    }
}

/// Best-effort decode problem recorded on a snapshot instead of failing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Anomaly {
    /// A stat kind without a decoding rule; its raw value was passed through.
    UnknownStat {
        unit: UnitId,
        kind: StatKind,
        raw: u32,
    },
    /// A unit record could not be read and was skipped.
    UnreadableUnit { kind: UnitKind, address: u64 },
    /// A unit's stat list could not be read; the unit has no stats.
    UnreadableStats { unit: UnitId },
    /// A hash bucket chain was longer than the walk limit.
    UnitChainTruncated { kind: UnitKind, bucket: u32 },
    /// A txt id wider than 16 bits; the unit was skipped.
    TxtIdOutOfRange {
        kind: UnitKind,
        unit: UnitId,
        raw: u32,
    },
    /// An area id wider than 16 bits; the player was placed in no area.
    AreaOutOfRange { unit: UnitId, raw: u32 },
    /// The cached map has no entry for the player's area.
    MissingAreaMap { area: Area },
    /// The UI or hover buffer could not be read; defaults were used.
    UnreadableUi,
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::UnknownStat { unit, kind, raw } => {
                write!(f, "unit {unit}: unknown stat {} (raw {raw})", kind.0)
            }
            Anomaly::UnreadableUnit { kind, address } => {
                write!(f, "unreadable {kind} unit at {address:#x}")
            }
            Anomaly::UnreadableStats { unit } => write!(f, "unit {unit}: unreadable stat list"),
            Anomaly::UnitChainTruncated { kind, bucket } => {
                write!(f, "{kind} bucket {bucket}: chain truncated")
            }
            Anomaly::TxtIdOutOfRange { kind, unit, raw } => {
                write!(f, "{kind} unit {unit}: txt id {raw} out of range")
            }
            Anomaly::AreaOutOfRange { unit, raw } => {
                write!(f, "unit {unit}: area id {raw} out of range")
            }
            Anomaly::MissingAreaMap { area } => write!(f, "no map data for {area}"),
            Anomaly::UnreadableUi => f.write_str("unreadable ui buffers"),
        }
    }
}
