//! Static map metadata for one game session.
//!
//! The map service resolves a session seed into per-area layouts. Positions
//! inside [`AreaMap`] are stored relative to the area origin; the accessors on
//! [`MapData`] translate them into absolute coordinates.
use std::collections::BTreeMap;

use crate::state::types::{AdjacentLevel, Area, CollisionGrid, NpcPlacement, Position};

/// Layout of a single area.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaMap {
    pub origin: Position,
    pub grid: CollisionGrid,
    #[cfg_attr(feature = "serde", serde(default))]
    pub npcs: Vec<NpcPlacement>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub exits: Vec<AdjacentLevel>,
}

/// Layouts of every area in a session, keyed by area.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapData {
    pub areas: BTreeMap<Area, AreaMap>,
}

impl MapData {
    pub fn new(areas: BTreeMap<Area, AreaMap>) -> Self {
        Self { areas }
    }

    pub fn area(&self, area: Area) -> Option<&AreaMap> {
        self.areas.get(&area)
    }

    /// Origin of `area`, or `None` when the area is not part of the map.
    pub fn origin(&self, area: Area) -> Option<Position> {
        self.area(area).map(|a| a.origin)
    }

    /// NPC placements and exits of `area` translated to absolute positions.
    pub fn npcs_and_exits(&self, area: Area) -> (Vec<NpcPlacement>, Vec<AdjacentLevel>) {
        let Some(map) = self.area(area) else {
            return (Vec::new(), Vec::new());
        };
        let absolute = |p: Position| Position::new(p.x + map.origin.x, p.y + map.origin.y);

        let npcs = map
            .npcs
            .iter()
            .map(|npc| NpcPlacement {
                name: npc.name,
                positions: npc.positions.iter().copied().map(absolute).collect(),
            })
            .collect();
        let exits = map
            .exits
            .iter()
            .map(|exit| AdjacentLevel {
                position: absolute(exit.position),
                ..*exit
            })
            .collect();
        (npcs, exits)
    }

    pub fn collision_grid(&self, area: Area) -> CollisionGrid {
        self.area(area).map(|a| a.grid.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::types::NpcId;

    #[test]
    fn placements_become_absolute() {
        let mut areas = BTreeMap::new();
        areas.insert(
            Area::THRONE_OF_DESTRUCTION,
            AreaMap {
                origin: Position::new(15000, 5000),
                grid: CollisionGrid::from_rows(&[".."]),
                npcs: vec![NpcPlacement {
                    name: NpcId::BAAL_CRAB,
                    positions: vec![Position::new(90, 30)],
                }],
                exits: vec![AdjacentLevel {
                    area: Area::THE_WORLDSTONE_KEEP_LEVEL_3,
                    position: Position::new(10, 900),
                    is_entrance: true,
                }],
            },
        );
        let map = MapData::new(areas);

        let (npcs, exits) = map.npcs_and_exits(Area::THRONE_OF_DESTRUCTION);
        assert_eq!(npcs[0].positions, vec![Position::new(15090, 5030)]);
        assert_eq!(exits[0].position, Position::new(15010, 5900));
        assert_eq!(exits[0].area, Area::THE_WORLDSTONE_KEEP_LEVEL_3);
    }

    #[test]
    fn unknown_area_is_empty() {
        let map = MapData::default();
        assert_eq!(map.origin(Area::HARROGATH), None);
        assert!(map.collision_grid(Area::HARROGATH).is_empty());
        assert_eq!(map.npcs_and_exits(Area::HARROGATH), (Vec::new(), Vec::new()));
    }
}
