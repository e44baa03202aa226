use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use super::area::Area;
use super::common::{Position, UnitId};
use super::stat::{StatKind, Stats};
use crate::error::ParseIdError;

/// Skill identifier (row of the game's skill table).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct SkillId(pub u16);

const SKILL_NAMES: &[(SkillId, &str)] = &[
    (SkillId::ATTACK, "attack"),
    (SkillId::FROZEN_ARMOR, "frozen_armor"),
    (SkillId::STATIC_FIELD, "static_field"),
    (SkillId::TELEPORT, "teleport"),
    (SkillId::GLACIAL_SPIKE, "glacial_spike"),
    (SkillId::ENERGY_SHIELD, "energy_shield"),
    (SkillId::BLIZZARD, "blizzard"),
    (SkillId::CLEANSING, "cleansing"),
    (SkillId::BLESSED_HAMMER, "blessed_hammer"),
    (SkillId::CONCENTRATION, "concentration"),
    (SkillId::VIGOR, "vigor"),
    (SkillId::HOLY_SHIELD, "holy_shield"),
    (SkillId::SALVATION, "salvation"),
    (SkillId::BATTLE_ORDERS, "battle_orders"),
    (SkillId::TOME_OF_TOWN_PORTAL, "tome_of_town_portal"),
];

impl SkillId {
    pub const ATTACK: Self = Self(0);
    pub const FROZEN_ARMOR: Self = Self(40);
    pub const STATIC_FIELD: Self = Self(42);
    pub const TELEPORT: Self = Self(54);
    pub const GLACIAL_SPIKE: Self = Self(55);
    pub const ENERGY_SHIELD: Self = Self(58);
    pub const BLIZZARD: Self = Self(59);
    pub const CLEANSING: Self = Self(109);
    pub const BLESSED_HAMMER: Self = Self(112);
    pub const CONCENTRATION: Self = Self(113);
    pub const VIGOR: Self = Self(115);
    pub const HOLY_SHIELD: Self = Self(117);
    pub const SALVATION: Self = Self(125);
    pub const BATTLE_ORDERS: Self = Self(149);
    pub const TOME_OF_TOWN_PORTAL: Self = Self(220);

    pub fn name(self) -> Option<&'static str> {
        SKILL_NAMES
            .iter()
            .find(|(id, _)| *id == self)
            .map(|(_, name)| *name)
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Accepts a snake_case skill name (case-insensitive) or a raw numeric id.
impl FromStr for SkillId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(raw) = trimmed.parse::<u16>() {
            return Ok(SkillId(raw));
        }
        SKILL_NAMES
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(trimmed))
            .map(|(id, _)| *id)
            .ok_or_else(|| ParseIdError::UnknownSkill(s.to_owned()))
    }
}

impl TryFrom<String> for SkillId {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SkillId> for String {
    fn from(value: SkillId) -> Self {
        value.to_string()
    }
}

/// Input binding (a key name understood by the input backend).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct KeyBinding(pub String);

impl KeyBinding {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Configured skill-to-key mapping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct KeyBindings(HashMap<SkillId, KeyBinding>);

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, skill: SkillId, key: impl Into<String>) -> Self {
        self.insert(skill, KeyBinding::new(key));
        self
    }

    pub fn insert(&mut self, skill: SkillId, binding: KeyBinding) {
        self.0.insert(skill, binding);
    }

    pub fn for_skill(&self, skill: SkillId) -> Option<&KeyBinding> {
        self.0.get(&skill)
    }

    pub fn is_bound(&self, skill: SkillId) -> bool {
        self.0.contains_key(&skill)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SkillId, &KeyBinding)> {
        self.0.iter().map(|(&skill, binding)| (skill, binding))
    }
}

impl FromIterator<(SkillId, KeyBinding)> for KeyBindings {
    fn from_iter<I: IntoIterator<Item = (SkillId, KeyBinding)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The locally controlled player unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerUnit {
    pub unit_id: UnitId,
    pub name: String,
    pub area: Area,
    pub position: Position,
    pub stats: Stats,
    /// Known skills with their hard-point levels.
    pub skills: BTreeMap<SkillId, u8>,
    pub left_skill: SkillId,
    pub right_skill: SkillId,
}

impl PlayerUnit {
    pub fn stat(&self, kind: StatKind) -> i64 {
        self.stats.value(kind)
    }

    pub fn knows(&self, skill: SkillId) -> bool {
        self.skills.contains_key(&skill)
    }

    pub fn is_poisoned(&self) -> bool {
        self.stat(StatKind::POISON_LENGTH) > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::types::Stat;

    #[test]
    fn skill_parses_name_or_number() {
        assert_eq!("blessed_hammer".parse::<SkillId>(), Ok(SkillId::BLESSED_HAMMER));
        assert_eq!("Salvation".parse::<SkillId>(), Ok(SkillId::SALVATION));
        assert_eq!("109".parse::<SkillId>(), Ok(SkillId::CLEANSING));
        assert!("fireball_of_doom".parse::<SkillId>().is_err());
    }

    #[test]
    fn unnamed_skill_displays_its_id() {
        assert_eq!(SkillId(300).to_string(), "300");
        assert_eq!(SkillId(300).to_string().parse::<SkillId>(), Ok(SkillId(300)));
    }

    #[test]
    fn poisoned_follows_decoded_duration() {
        for (value, expected) in [(0, false), (1, true), (25, true), (1000, true)] {
            let player = PlayerUnit {
                stats: [Stat {
                    kind: StatKind::POISON_LENGTH,
                    value,
                }]
                .into_iter()
                .collect(),
                ..PlayerUnit::default()
            };
            assert_eq!(player.is_poisoned(), expected, "poison length {value}");
        }
    }

    #[test]
    fn bindings_lookup() {
        let bindings = KeyBindings::new().with(SkillId::CLEANSING, "F5");
        assert_eq!(
            bindings.for_skill(SkillId::CLEANSING).map(KeyBinding::as_str),
            Some("F5")
        );
        assert!(!bindings.is_bound(SkillId::SALVATION));
    }
}
