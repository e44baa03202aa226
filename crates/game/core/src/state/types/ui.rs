use super::common::{Position, UnitId};

/// Menus open at the time of the snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpenMenus {
    pub inventory: bool,
    pub npc_interact: bool,
    pub npc_shop: bool,
    pub stash: bool,
    pub waypoint: bool,
}

impl OpenMenus {
    pub fn any(&self) -> bool {
        self.inventory || self.npc_interact || self.npc_shop || self.stash || self.waypoint
    }
}

/// Unit under the mouse cursor.
///
/// `unit_type` and `unit_id` are only meaningful when `is_hovered` is set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HoverData {
    pub is_hovered: bool,
    pub unit_type: u32,
    pub unit_id: UnitId,
}

impl HoverData {
    pub const NONE: Self = Self {
        is_hovered: false,
        unit_type: 0,
        unit_id: UnitId(0),
    };
}

/// Player corpse. Not decoded yet, always reported absent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Corpse {
    pub found: bool,
    pub position: Position,
}
