use std::fmt;
use std::sync::Arc;

use super::common::{Position, UnitId};
use super::stat::Stats;

/// Monster class identifier (row of the game's monster table).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct NpcId(pub u16);

impl NpcId {
    pub const BAAL_CRAB: Self = Self(544);
    pub const BAAL_SUBJECT_MUMMY: Self = Self(558);
    pub const COUNCIL_MEMBER_BALL: Self = Self(559);
    pub const BAALS_MINION: Self = Self(562);
    pub const WARPED_SHAMAN: Self = Self(565);
    pub const VENOM_LORD_2: Self = Self(571);
    pub const BURNING_SOUL_2: Self = Self(640);
    pub const BLACK_SOUL_2: Self = Self(641);
    pub const UNDEAD_SOUL_KILLER_2: Self = Self(690);
    pub const UNDEAD_STYGIAN_DOLL_2: Self = Self(691);

    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::BAAL_CRAB => "Baal",
            Self::BAAL_SUBJECT_MUMMY => "Baal Subject Mummy",
            Self::COUNCIL_MEMBER_BALL => "Council Member",
            Self::BAALS_MINION => "Baal's Minion",
            Self::WARPED_SHAMAN => "Warped Shaman",
            Self::VENOM_LORD_2 => "Venom Lord",
            Self::BURNING_SOUL_2 => "Burning Soul",
            Self::BLACK_SOUL_2 => "Black Soul",
            Self::UNDEAD_SOUL_KILLER_2 => "Undead Soul Killer",
            Self::UNDEAD_STYGIAN_DOLL_2 => "Undead Stygian Doll",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for NpcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "npc#{}", self.0),
        }
    }
}

/// Rank of a monster as encoded in its monster-data flags.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MonsterType {
    /// Regular monster.
    #[default]
    None,
    Minion,
    Champion,
    Unique,
    SuperUnique,
}

impl MonsterType {
    pub fn is_elite(self) -> bool {
        !matches!(self, MonsterType::None)
    }
}

/// Live monster decoded from the unit table. Dead units are never decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Monster {
    pub unit_id: UnitId,
    pub name: NpcId,
    pub kind: MonsterType,
    pub position: Position,
    pub stats: Stats,
}

impl Monster {
    pub fn is_elite(&self) -> bool {
        self.kind.is_elite()
    }
}

/// Selection predicate used when clearing areas or picking targets.
#[derive(Clone, Default)]
pub enum MonsterFilter {
    #[default]
    Any,
    /// Champions, uniques, super uniques and their minions.
    Elite,
    Custom(Arc<dyn Fn(&Monster) -> bool + Send + Sync>),
}

impl MonsterFilter {
    pub fn custom(predicate: impl Fn(&Monster) -> bool + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(predicate))
    }

    pub fn matches(&self, monster: &Monster) -> bool {
        match self {
            MonsterFilter::Any => true,
            MonsterFilter::Elite => monster.is_elite(),
            MonsterFilter::Custom(predicate) => predicate(monster),
        }
    }
}

impl fmt::Debug for MonsterFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonsterFilter::Any => f.write_str("Any"),
            MonsterFilter::Elite => f.write_str("Elite"),
            MonsterFilter::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Monsters visible in one snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Monsters(Vec<Monster>);

impl Monsters {
    pub fn new(monsters: Vec<Monster>) -> Self {
        Self(monsters)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Monster> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First monster with exactly this class and rank.
    pub fn find_one(&self, name: NpcId, kind: MonsterType) -> Option<&Monster> {
        self.0.iter().find(|m| m.name == name && m.kind == kind)
    }

    pub fn find_by_id(&self, unit_id: UnitId) -> Option<&Monster> {
        self.0.iter().find(|m| m.unit_id == unit_id)
    }

    /// Monsters matching `filter`, in decode order.
    pub fn enemies(&self, filter: &MonsterFilter) -> Vec<&Monster> {
        self.0.iter().filter(|m| filter.matches(m)).collect()
    }
}

impl FromIterator<Monster> for Monsters {
    fn from_iter<I: IntoIterator<Item = Monster>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monster(id: u32, name: NpcId, kind: MonsterType) -> Monster {
        Monster {
            unit_id: UnitId(id),
            name,
            kind,
            position: Position::ORIGIN,
            stats: Stats::default(),
        }
    }

    #[test]
    fn find_one_requires_matching_rank() {
        let monsters = Monsters::new(vec![
            monster(1, NpcId::BAALS_MINION, MonsterType::Minion),
            monster(2, NpcId::WARPED_SHAMAN, MonsterType::Minion),
        ]);

        assert!(
            monsters
                .find_one(NpcId::WARPED_SHAMAN, MonsterType::SuperUnique)
                .is_none()
        );
        let found = monsters
            .find_one(NpcId::BAALS_MINION, MonsterType::Minion)
            .map(|m| m.unit_id);
        assert_eq!(found, Some(UnitId(1)));
    }

    #[test]
    fn filters_select_expected_monsters() {
        let monsters = Monsters::new(vec![
            monster(1, NpcId::BLACK_SOUL_2, MonsterType::None),
            monster(2, NpcId::VENOM_LORD_2, MonsterType::SuperUnique),
            monster(3, NpcId::BAALS_MINION, MonsterType::Minion),
        ]);

        assert_eq!(monsters.enemies(&MonsterFilter::Any).len(), 3);
        assert_eq!(monsters.enemies(&MonsterFilter::Elite).len(), 2);

        let souls = MonsterFilter::custom(|m| m.name == NpcId::BLACK_SOUL_2);
        let picked: Vec<_> = monsters.enemies(&souls).iter().map(|m| m.unit_id).collect();
        assert_eq!(picked, vec![UnitId(1)]);
    }

    #[test]
    fn monster_type_parses_snake_case() {
        assert_eq!("super_unique".parse::<MonsterType>(), Ok(MonsterType::SuperUnique));
        assert_eq!(MonsterType::Champion.to_string(), "champion");
    }
}
