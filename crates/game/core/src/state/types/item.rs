//! Items visible to the player (ground, inventory, stash, vendors).
use bitflags::bitflags;

use super::common::{Position, UnitId};
use super::stat::Stats;

/// Item class identifier (row of the game's item table).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct ItemId(pub u16);

bitflags! {
    /// Property bits of an item's flag word. Bits are independent.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ItemFlags: u32 {
        const IDENTIFIED   = 0x0000_0010;
        const SOCKETED     = 0x0000_0800;
        const VENDOR       = 0x0000_2000;
        const ETHEREAL     = 0x0040_0000;
        const PERSONALIZED = 0x0100_0000;
        const RUNEWORD     = 0x0400_0000;
    }
}

impl ItemFlags {
    /// Keeps known bits and drops the rest of the raw word.
    pub fn from_word(word: u32) -> Self {
        Self::from_bits_truncate(word)
    }
}

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
pub enum ItemQuality {
    #[default]
    Unknown,
    LowQuality,
    Normal,
    Superior,
    Magic,
    Set,
    Rare,
    Unique,
    Crafted,
}

impl ItemQuality {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            1 => Self::LowQuality,
            2 => Self::Normal,
            3 => Self::Superior,
            4 => Self::Magic,
            5 => Self::Set,
            6 => Self::Rare,
            7 => Self::Unique,
            8 => Self::Crafted,
            _ => Self::Unknown,
        }
    }
}

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
pub enum ItemLocation {
    #[default]
    Ground,
    Inventory,
    Equipped,
    Belt,
    Stash,
    Cube,
    Vendor,
}

impl ItemLocation {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0 => Self::Inventory,
            1 => Self::Equipped,
            2 => Self::Belt,
            3 => Self::Cube,
            4 => Self::Stash,
            5 => Self::Vendor,
            _ => Self::Ground,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub unit_id: UnitId,
    pub name: ItemId,
    pub quality: ItemQuality,
    pub location: ItemLocation,
    pub position: Position,
    pub flags: ItemFlags,
    pub stats: Stats,
}

impl Item {
    pub fn is_ethereal(&self) -> bool {
        self.flags.contains(ItemFlags::ETHEREAL)
    }

    pub fn is_identified(&self) -> bool {
        self.flags.contains(ItemFlags::IDENTIFIED)
    }

    pub fn is_vendor(&self) -> bool {
        self.flags.contains(ItemFlags::VENDOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_flag_decodes_alone() {
        for (word, flag) in [
            (0x0000_0010, ItemFlags::IDENTIFIED),
            (0x0000_0800, ItemFlags::SOCKETED),
            (0x0000_2000, ItemFlags::VENDOR),
            (0x0040_0000, ItemFlags::ETHEREAL),
            (0x0100_0000, ItemFlags::PERSONALIZED),
            (0x0400_0000, ItemFlags::RUNEWORD),
        ] {
            assert_eq!(ItemFlags::from_word(word), flag);
        }
    }

    #[test]
    fn flags_are_not_exclusive() {
        let flags = ItemFlags::from_word(0x0040_2010 | 0x8000_0001);
        assert!(flags.contains(ItemFlags::ETHEREAL));
        assert!(flags.contains(ItemFlags::IDENTIFIED));
        assert!(flags.contains(ItemFlags::VENDOR));
        assert!(!flags.contains(ItemFlags::SOCKETED));
        assert_eq!(flags.bits(), 0x0040_2010);
    }

    #[test]
    fn raw_quality_maps_to_variants() {
        assert_eq!(ItemQuality::from_raw(7), ItemQuality::Unique);
        assert_eq!(ItemQuality::from_raw(42), ItemQuality::Unknown);
        assert_eq!(ItemLocation::from_raw(4), ItemLocation::Stash);
    }
}
