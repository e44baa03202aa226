use std::fmt;

use super::common::Position;
use super::monster::NpcId;

/// Level identifier as used by the game's level table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Area(pub u16);

impl Area {
    pub const NONE: Self = Self(0);
    pub const ROGUE_ENCAMPMENT: Self = Self(1);
    pub const LUT_GHOLEIN: Self = Self(40);
    pub const KURAST_DOCKS: Self = Self(75);
    pub const THE_PANDEMONIUM_FORTRESS: Self = Self(103);
    pub const HARROGATH: Self = Self(109);
    pub const THE_WORLDSTONE_KEEP_LEVEL_1: Self = Self(128);
    pub const THE_WORLDSTONE_KEEP_LEVEL_2: Self = Self(129);
    pub const THE_WORLDSTONE_KEEP_LEVEL_3: Self = Self(130);
    pub const THRONE_OF_DESTRUCTION: Self = Self(131);
    pub const THE_WORLDSTONE_CHAMBER: Self = Self(132);

    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::ROGUE_ENCAMPMENT => "Rogue Encampment",
            Self::LUT_GHOLEIN => "Lut Gholein",
            Self::KURAST_DOCKS => "Kurast Docks",
            Self::THE_PANDEMONIUM_FORTRESS => "The Pandemonium Fortress",
            Self::HARROGATH => "Harrogath",
            Self::THE_WORLDSTONE_KEEP_LEVEL_1 => "The Worldstone Keep Level 1",
            Self::THE_WORLDSTONE_KEEP_LEVEL_2 => "The Worldstone Keep Level 2",
            Self::THE_WORLDSTONE_KEEP_LEVEL_3 => "The Worldstone Keep Level 3",
            Self::THRONE_OF_DESTRUCTION => "Throne of Destruction",
            Self::THE_WORLDSTONE_CHAMBER => "The Worldstone Chamber",
            _ => return None,
        };
        Some(name)
    }

    pub fn is_town(self) -> bool {
        matches!(
            self,
            Self::ROGUE_ENCAMPMENT
                | Self::LUT_GHOLEIN
                | Self::KURAST_DOCKS
                | Self::THE_PANDEMONIUM_FORTRESS
                | Self::HARROGATH
        )
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "area#{}", self.0),
        }
    }
}

/// Walkability grid for one area, indexed in coordinates local to the area origin.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollisionGrid {
    width: u32,
    height: u32,
    walkable: Vec<bool>,
}

impl CollisionGrid {
    /// Builds a grid from row-major cells.
    ///
    /// Map metadata comes from an external service, so a cell vector of the
    /// wrong length is padded with blocked cells or truncated instead of
    /// rejected.
    pub fn new(width: u32, height: u32, mut walkable: Vec<bool>) -> Self {
        walkable.resize(width as usize * height as usize, false);
        Self {
            width,
            height,
            walkable,
        }
    }

    /// Builds a grid from text rows where `.` marks a walkable cell.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Self {
        let height = rows.len() as u32;
        let width = rows
            .iter()
            .map(|row| row.as_ref().chars().count())
            .max()
            .unwrap_or(0) as u32;

        let mut walkable = Vec::with_capacity(width as usize * height as usize);
        for row in rows {
            let mut cells: Vec<bool> = row.as_ref().chars().map(|c| c == '.').collect();
            cells.resize(width as usize, false);
            walkable.extend(cells);
        }

        Self::new(width, height, walkable)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.walkable.is_empty()
    }

    /// Returns true if `local` lies inside the grid on a walkable cell.
    pub fn is_walkable(&self, local: Position) -> bool {
        if local.x < 0 || local.y < 0 {
            return false;
        }
        let (x, y) = (local.x as u32, local.y as u32);
        if x >= self.width || y >= self.height {
            return false;
        }
        self.walkable
            .get(y as usize * self.width as usize + x as usize)
            .copied()
            .unwrap_or(false)
    }
}

/// Exit from the current area into a neighbouring one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdjacentLevel {
    pub area: Area,
    /// Absolute position of the exit.
    pub position: Position,
    pub is_entrance: bool,
}

/// Static spawn placement of an NPC or preset monster taken from map metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NpcPlacement {
    pub name: NpcId,
    /// Absolute positions.
    pub positions: Vec<Position>,
}
