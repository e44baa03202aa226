//! Offset table locating game structures in process memory.
//!
//! Offsets change with every game patch and are maintained outside the bot.
//! [`Offsets::default`] is the baseline table; deployments override it with a
//! TOML file whose missing fields fall back to the baseline.

/// Module-relative addresses of global structures plus per-structure field offsets.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Offsets {
    /// Unit hash table, relative to the module base.
    pub unit_table: u64,
    /// Open-menu flag buffer, relative to the module base.
    pub ui: u64,
    /// Hover buffer, relative to the module base.
    pub hover: u64,
    /// Upper bound on units walked per hash bucket.
    pub max_bucket_chain: u32,
    pub unit: UnitOffsets,
    pub path: PathOffsets,
    pub stats: StatListOffsets,
    pub skills: SkillOffsets,
    pub monster: MonsterOffsets,
    pub item: ItemOffsets,
    pub menus: MenuOffsets,
}

impl Offsets {
    pub const BUCKETS_PER_KIND: u64 = 128;
    pub const UI_BUFFER_LEN: usize = 32;
    pub const HOVER_BUFFER_LEN: usize = 12;
}

impl Default for Offsets {
    fn default() -> Self {
        Self {
            unit_table: 0x020A_F660,
            ui: 0x020B_F31A,
            hover: 0x020A_E6F8,
            max_bucket_chain: 256,
            unit: UnitOffsets::default(),
            path: PathOffsets::default(),
            stats: StatListOffsets::default(),
            skills: SkillOffsets::default(),
            monster: MonsterOffsets::default(),
            item: ItemOffsets::default(),
            menus: MenuOffsets::default(),
        }
    }
}

/// Fields of the common unit record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct UnitOffsets {
    pub kind: u64,
    pub txt_id: u64,
    pub unit_id: u64,
    pub mode: u64,
    pub unit_data: u64,
    pub act: u64,
    pub path: u64,
    pub stat_list: u64,
    pub inventory: u64,
    pub skill_list: u64,
    pub next: u64,
    /// Map seed inside the act record.
    pub act_map_seed: u64,
    /// Non-zero for the locally controlled player, inside the inventory record.
    pub inventory_local_flag: u64,
    /// Player name inside the player data record.
    pub player_name: u64,
    pub player_name_len: usize,
}

impl Default for UnitOffsets {
    fn default() -> Self {
        Self {
            kind: 0x00,
            txt_id: 0x04,
            unit_id: 0x08,
            mode: 0x0C,
            unit_data: 0x10,
            act: 0x20,
            path: 0x38,
            stat_list: 0x88,
            inventory: 0x90,
            skill_list: 0x100,
            next: 0x150,
            act_map_seed: 0x1C,
            inventory_local_flag: 0x70,
            player_name: 0x00,
            player_name_len: 16,
        }
    }
}

/// Dynamic path (players, monsters) and static path (items, objects) records.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct PathOffsets {
    pub x: u64,
    pub y: u64,
    pub room: u64,
    pub room_ex: u64,
    pub level: u64,
    pub level_area: u64,
    pub static_x: u64,
    pub static_y: u64,
}

impl Default for PathOffsets {
    fn default() -> Self {
        Self {
            x: 0x02,
            y: 0x06,
            room: 0x20,
            room_ex: 0x18,
            level: 0x90,
            level_area: 0x1F8,
            static_x: 0x10,
            static_y: 0x14,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct StatListOffsets {
    pub array: u64,
    pub count: u64,
    /// Upper bound on entries decoded per list.
    pub max_entries: u32,
}

impl StatListOffsets {
    /// `(u16 layer, u16 kind, u32 value)`.
    pub const ENTRY_LEN: usize = 8;
}

impl Default for StatListOffsets {
    fn default() -> Self {
        Self {
            array: 0x30,
            count: 0x38,
            max_entries: 512,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SkillOffsets {
    pub first: u64,
    pub left: u64,
    pub right: u64,
    pub txt: u64,
    pub txt_id: u64,
    pub level: u64,
    pub next: u64,
    pub max_skills: u32,
}

impl Default for SkillOffsets {
    fn default() -> Self {
        Self {
            first: 0x00,
            left: 0x08,
            right: 0x10,
            txt: 0x00,
            txt_id: 0x00,
            level: 0x48,
            next: 0x08,
            max_skills: 256,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct MonsterOffsets {
    /// Rank flags byte inside the monster data record.
    pub flags: u64,
    /// Unit modes of dead or dying monsters.
    pub dead_modes: Vec<u32>,
}

impl Default for MonsterOffsets {
    fn default() -> Self {
        Self {
            flags: 0x1A,
            dead_modes: vec![0, 12],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ItemOffsets {
    pub quality: u64,
    pub location: u64,
    pub flags: u64,
}

impl Default for ItemOffsets {
    fn default() -> Self {
        Self {
            quality: 0x00,
            location: 0x0C,
            flags: 0x18,
        }
    }
}

/// Byte index of each menu flag inside the UI buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct MenuOffsets {
    pub inventory: usize,
    pub npc_interact: usize,
    pub npc_shop: usize,
    pub waypoint: usize,
    pub stash: usize,
}

impl Default for MenuOffsets {
    fn default() -> Self {
        Self {
            inventory: 0x01,
            npc_interact: 0x08,
            npc_shop: 0x0B,
            waypoint: 0x13,
            stash: 0x18,
        }
    }
}
