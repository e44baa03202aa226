//! Unit statistics and the table describing how each stat is stored in memory.
use std::collections::BTreeMap;
use std::fmt;

/// Stat identifier (row of the game's item-stat-cost table).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct StatKind(pub u16);

/// How a stat value is encoded in its raw 32-bit memory slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatEncoding {
    /// Stored as-is.
    Plain,
    /// Fixed point with 8 fractional bits.
    FixedPoint8,
    /// Duration in game frames; 25 frames per second.
    Frames,
}

impl StatEncoding {
    pub const FRAMES_PER_SECOND: u32 = 25;

    /// Converts a raw slot value into the caller-facing integer.
    ///
    /// The result is wider than the slot so every `u32` survives unchanged.
    pub const fn decode(self, raw: u32) -> i64 {
        match self {
            StatEncoding::Plain => raw as i64,
            StatEncoding::FixedPoint8 => (raw >> 8) as i64,
            StatEncoding::Frames => (raw / Self::FRAMES_PER_SECOND) as i64,
        }
    }
}

/// Static description of a known stat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatDescriptor {
    pub kind: StatKind,
    pub name: &'static str,
    pub encoding: StatEncoding,
}

macro_rules! stat_table {
    ($( $konst:ident = $id:literal, $name:literal, $enc:ident; )*) => {
        impl StatKind {
            $( pub const $konst: Self = Self($id); )*
        }

        /// Every stat kind the decoder knows about. Kinds missing here are
        /// decoded as plain values and reported as anomalies.
        pub const STAT_TABLE: &[StatDescriptor] = &[
            $( StatDescriptor { kind: StatKind($id), name: $name, encoding: StatEncoding::$enc }, )*
        ];
    };
}

stat_table! {
    STRENGTH = 0, "strength", Plain;
    ENERGY = 1, "energy", Plain;
    DEXTERITY = 2, "dexterity", Plain;
    VITALITY = 3, "vitality", Plain;
    STAT_POINTS = 4, "statpts", Plain;
    SKILL_POINTS = 5, "newskills", Plain;
    LIFE = 6, "hitpoints", FixedPoint8;
    MAX_LIFE = 7, "maxhp", FixedPoint8;
    MANA = 8, "mana", FixedPoint8;
    MAX_MANA = 9, "maxmana", FixedPoint8;
    STAMINA = 10, "stamina", FixedPoint8;
    MAX_STAMINA = 11, "maxstamina", FixedPoint8;
    LEVEL = 12, "level", Plain;
    EXPERIENCE = 13, "experience", Plain;
    GOLD = 14, "gold", Plain;
    STASH_GOLD = 15, "goldbank", Plain;
    ENHANCED_DEFENSE = 16, "item_armor_percent", Plain;
    DEFENSE = 31, "armorclass", Plain;
    FIRE_RESIST = 39, "fireresist", Plain;
    MAX_FIRE_RESIST = 40, "maxfireresist", Plain;
    LIGHTNING_RESIST = 41, "lightresist", Plain;
    MAX_LIGHTNING_RESIST = 42, "maxlightresist", Plain;
    COLD_RESIST = 43, "coldresist", Plain;
    MAX_COLD_RESIST = 44, "maxcoldresist", Plain;
    POISON_RESIST = 45, "poisonresist", Plain;
    MAX_POISON_RESIST = 46, "maxpoisonresist", Plain;
    COLD_LENGTH = 56, "coldlength", Frames;
    POISON_LENGTH = 59, "poisonlength", Frames;
    VELOCITY_PERCENT = 67, "velocitypercent", Plain;
    ATTACK_RATE = 68, "attackrate", Plain;
    GOLD_FIND = 79, "item_goldbonus", Plain;
    MAGIC_FIND = 80, "item_magicbonus", Plain;
    FASTER_ATTACK_RATE = 93, "item_fasterattackrate", Plain;
    FASTER_RUN_WALK = 96, "item_fastermovevelocity", Plain;
    FASTER_HIT_RECOVERY = 99, "item_fastergethitrate", Plain;
    FASTER_BLOCK_RATE = 102, "item_fasterblockrate", Plain;
    FASTER_CAST_RATE = 105, "item_fastercastrate", Plain;
    SINGLE_SKILL = 107, "item_singleskill", Plain;
    ALL_SKILLS = 127, "item_allskills", Plain;
    LIFE_PER_LEVEL = 216, "item_hp_perlevel", FixedPoint8;
    MANA_PER_LEVEL = 217, "item_mana_perlevel", FixedPoint8;
}

impl StatKind {
    pub fn descriptor(self) -> Option<&'static StatDescriptor> {
        STAT_TABLE.iter().find(|d| d.kind == self)
    }

    pub fn name(self) -> Option<&'static str> {
        self.descriptor().map(|d| d.name)
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "stat#{}", self.0),
        }
    }
}

/// A decoded `(kind, value)` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stat {
    pub kind: StatKind,
    pub value: i64,
}

/// Decoded stat values of one unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Stats(BTreeMap<StatKind, i64>);

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a stat unless a value for the same kind is already present.
    pub fn insert(&mut self, stat: Stat) {
        self.0.entry(stat.kind).or_insert(stat.value);
    }

    /// Replaces the value of `kind`.
    pub fn set(&mut self, kind: StatKind, value: i64) {
        self.0.insert(kind, value);
    }

    pub fn remove(&mut self, kind: StatKind) -> Option<i64> {
        self.0.remove(&kind)
    }

    pub fn get(&self, kind: StatKind) -> Option<i64> {
        self.0.get(&kind).copied()
    }

    /// Value of `kind`, or 0 when the unit does not carry the stat.
    pub fn value(&self, kind: StatKind) -> i64 {
        self.get(kind).unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = Stat> + '_ {
        self.0.iter().map(|(&kind, &value)| Stat { kind, value })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Stat> for Stats {
    fn from_iter<I: IntoIterator<Item = Stat>>(iter: I) -> Self {
        let mut stats = Stats::new();
        for stat in iter {
            stats.insert(stat);
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_unique_kinds() {
        for (i, a) in STAT_TABLE.iter().enumerate() {
            for b in &STAT_TABLE[i + 1..] {
                assert_ne!(a.kind, b.kind, "{} and {} share an id", a.name, b.name);
            }
        }
    }

    #[test]
    fn resource_family_is_fixed_point() {
        for kind in [
            StatKind::LIFE,
            StatKind::MAX_LIFE,
            StatKind::MANA,
            StatKind::MAX_MANA,
            StatKind::STAMINA,
            StatKind::MAX_STAMINA,
            StatKind::LIFE_PER_LEVEL,
            StatKind::MANA_PER_LEVEL,
        ] {
            let encoding = kind.descriptor().map(|d| d.encoding);
            assert_eq!(encoding, Some(StatEncoding::FixedPoint8), "{kind}");
        }
    }

    #[test]
    fn first_value_wins() {
        let stats: Stats = [
            Stat { kind: StatKind::LEVEL, value: 90 },
            Stat { kind: StatKind::LEVEL, value: 1 },
        ]
        .into_iter()
        .collect();
        assert_eq!(stats.get(StatKind::LEVEL), Some(90));
        assert_eq!(stats.value(StatKind::GOLD), 0);
    }
}
