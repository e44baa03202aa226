use std::fmt;

use super::common::{Position, UnitId};

/// Object class identifier (row of the game's object table).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct ObjectId(pub u16);

impl ObjectId {
    pub const TOWN_PORTAL: Self = Self(59);
    pub const WAYPOINT_PORTAL: Self = Self(119);
    pub const BAALS_PORTAL: Self = Self(563);

    pub fn name(self) -> Option<&'static str> {
        match self {
            Self::TOWN_PORTAL => Some("Town Portal"),
            Self::WAYPOINT_PORTAL => Some("Waypoint"),
            Self::BAALS_PORTAL => Some("Baal's Portal"),
            _ => None,
        }
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "object#{}", self.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Object {
    pub unit_id: UnitId,
    pub name: ObjectId,
    pub position: Position,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Objects(Vec<Object>);

impl Objects {
    pub fn new(objects: Vec<Object>) -> Self {
        Self(objects)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Object> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn find_one(&self, name: ObjectId) -> Option<&Object> {
        self.0.iter().find(|o| o.name == name)
    }
}

impl FromIterator<Object> for Objects {
    fn from_iter<I: IntoIterator<Item = Object>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
