//! Synthetic game memory laid out according to an [`Offsets`] table.
//!
//! Builds the unit hash table, unit records and UI buffers inside a
//! [`MemoryImage`] so the reader can be driven without a game process.
use std::sync::Arc;

use game_core::{
    Area, ItemFlags, MonsterType, NpcId, ObjectId, Offsets, Position, SkillId, StatKind, UnitKind,
};

use super::image::MemoryImage;
use super::source::{MemoryReadExt, MemorySource};

/// Size reserved for every synthetic record; larger than any baseline offset.
const RECORD_LEN: usize = 0x400;
const UNIT_KIND_COUNT: u64 = 6;

#[derive(Clone, Debug)]
pub struct PlayerSpec {
    pub unit_id: u32,
    pub name: String,
    pub area: Area,
    pub position: Position,
    pub map_seed: u32,
    /// Raw (still encoded) stat values.
    pub stats: Vec<(StatKind, u32)>,
    pub skills: Vec<(SkillId, u8)>,
    pub left_skill: SkillId,
    pub right_skill: SkillId,
}

impl Default for PlayerSpec {
    fn default() -> Self {
        Self {
            unit_id: 1,
            name: "synthetic".to_owned(),
            area: Area::THRONE_OF_DESTRUCTION,
            position: Position::new(15094, 5029),
            map_seed: 1,
            stats: Vec::new(),
            skills: Vec::new(),
            left_skill: SkillId::ATTACK,
            right_skill: SkillId::ATTACK,
        }
    }
}

#[derive(Clone, Debug)]
pub struct MonsterSpec {
    pub unit_id: u32,
    pub name: NpcId,
    pub kind: MonsterType,
    pub position: Position,
    pub mode: u32,
    pub stats: Vec<(StatKind, u32)>,
}

impl MonsterSpec {
    /// Live monster in its neutral mode.
    pub const ALIVE_MODE: u32 = 1;
    pub const DEAD_MODE: u32 = 12;

    pub fn new(unit_id: u32, name: NpcId, kind: MonsterType, position: Position) -> Self {
        Self {
            unit_id,
            name,
            kind,
            position,
            mode: Self::ALIVE_MODE,
            stats: Vec::new(),
        }
    }
}

/// Writer for synthetic game memory.
pub struct SyntheticGame {
    image: Arc<MemoryImage>,
    offsets: Offsets,
}

impl SyntheticGame {
    pub const MODULE_BASE: u64 = 0x1_4000_0000;

    pub fn new(offsets: Offsets) -> Self {
        let image = Arc::new(MemoryImage::new(Self::MODULE_BASE));
        let table_len = UNIT_KIND_COUNT * Offsets::BUCKETS_PER_KIND * 8;
        image.map(
            Self::MODULE_BASE + offsets.unit_table,
            table_len as usize,
        );
        image.map(Self::MODULE_BASE + offsets.ui, Offsets::UI_BUFFER_LEN);
        image.map(Self::MODULE_BASE + offsets.hover, Offsets::HOVER_BUFFER_LEN);
        Self { image, offsets }
    }

    pub fn image(&self) -> Arc<MemoryImage> {
        Arc::clone(&self.image)
    }

    pub fn offsets(&self) -> &Offsets {
        &self.offsets
    }

    pub fn add_player(&self, spec: &PlayerSpec) -> u64 {
        let u = &self.offsets.unit;
        let unit = self.unit_record(UnitKind::Player, 0, spec.unit_id);

        let data = self.record();
        let mut name = spec.name.as_bytes().to_vec();
        name.truncate(u.player_name_len.saturating_sub(1));
        self.image.write_bytes(data + u.player_name, &name);
        self.image.write_u64(unit + u.unit_data, data);

        let act = self.record();
        self.image.write_u32(act + u.act_map_seed, spec.map_seed);
        self.image.write_u64(unit + u.act, act);

        let inventory = self.record();
        self.image.write_u8(inventory + u.inventory_local_flag, 1);
        self.image.write_u64(unit + u.inventory, inventory);

        self.write_dynamic_path(unit, spec.position, spec.area);
        self.write_stats(unit, &spec.stats);
        self.write_skills(unit, spec);

        self.link(UnitKind::Player, spec.unit_id, unit);
        unit
    }

    pub fn add_monster(&self, spec: &MonsterSpec) -> u64 {
        let unit = self.unit_record(UnitKind::Monster, spec.name.0.into(), spec.unit_id);
        self.image.write_u32(unit + self.offsets.unit.mode, spec.mode);

        let data = self.record();
        let flags = match spec.kind {
            MonsterType::None => 0,
            MonsterType::SuperUnique => 0x02,
            MonsterType::Champion => 0x04,
            MonsterType::Unique => 0x08,
            MonsterType::Minion => 0x10,
        };
        self.image.write_u8(data + self.offsets.monster.flags, flags);
        self.image.write_u64(unit + self.offsets.unit.unit_data, data);

        self.write_dynamic_path(unit, spec.position, Area::NONE);
        self.write_stats(unit, &spec.stats);
        self.link(UnitKind::Monster, spec.unit_id, unit);
        unit
    }

    /// Marks a monster record dead; the reader stops reporting it.
    pub fn kill(&self, unit: u64) {
        self.image
            .write_u32(unit + self.offsets.unit.mode, MonsterSpec::DEAD_MODE);
    }

    pub fn add_object(&self, unit_id: u32, name: ObjectId, position: Position) -> u64 {
        let unit = self.unit_record(UnitKind::Object, name.0.into(), unit_id);
        self.write_static_path(unit, position);
        self.link(UnitKind::Object, unit_id, unit);
        unit
    }

    pub fn add_item(&self, unit_id: u32, txt_id: u16, quality: u32, flags: ItemFlags) -> u64 {
        let o = &self.offsets.item;
        let unit = self.unit_record(UnitKind::Item, txt_id.into(), unit_id);
        let data = self.record();
        self.image.write_u32(data + o.quality, quality);
        self.image.write_u32(data + o.flags, flags.bits());
        self.image.write_u64(unit + self.offsets.unit.unit_data, data);
        self.write_static_path(unit, Position::ORIGIN);
        self.write_stats(unit, &[]);
        self.link(UnitKind::Item, unit_id, unit);
        unit
    }

    /// Moves a unit with a dynamic path.
    pub fn move_unit(&self, unit: u64, to: Position) {
        if let Ok(path) = self.image.read_ptr(unit, self.offsets.unit.path) {
            self.image
                .write_u16(path + self.offsets.path.x, to.x as u16);
            self.image
                .write_u16(path + self.offsets.path.y, to.y as u16);
        }
    }

    /// Rewrites the area id behind a unit's path.
    pub fn set_area(&self, unit: u64, area: Area) {
        self.set_raw_area(unit, area.0.into());
    }

    /// Writes an arbitrary 32-bit area id, including ones no area uses.
    pub fn set_raw_area(&self, unit: u64, raw: u32) {
        let p = &self.offsets.path;
        let level = self
            .image
            .read_ptr(unit, self.offsets.unit.path)
            .and_then(|path| self.image.read_ptr(path, p.room))
            .and_then(|room| self.image.read_ptr(room, p.room_ex))
            .and_then(|room_ex| self.image.read_ptr(room_ex, p.level));
        if let Ok(level) = level {
            self.image.write_u32(level + p.level_area, raw);
        }
    }

    /// Overwrites the raw txt id of any unit record.
    pub fn set_txt_id(&self, unit: u64, raw: u32) {
        self.image.write_u32(unit + self.offsets.unit.txt_id, raw);
    }

    /// Rewrites one raw stat of a unit, appending it when absent.
    pub fn set_stat(&self, unit: u64, kind: StatKind, raw: u32) {
        let s = &self.offsets.stats;
        let Ok(list) = self.image.read_ptr(unit, self.offsets.unit.stat_list) else {
            return;
        };
        let count = self.image.read_u32(list, s.count).unwrap_or(0);
        let Ok(array) = self.image.read_ptr(list, s.array) else {
            return;
        };
        for i in 0..count as u64 {
            let entry = array + i * 8;
            if self.image.read_u16(entry, 2).ok() == Some(kind.0)
                && self.image.read_u16(entry, 0).ok() == Some(0)
            {
                self.image.write_u32(entry + 4, raw);
                return;
            }
        }
        let entry = array + count as u64 * 8;
        self.image.write_u16(entry, 0);
        self.image.write_u16(entry + 2, kind.0);
        self.image.write_u32(entry + 4, raw);
        self.image.write_u32(list + s.count, count + 1);
    }

    /// Sets the right-hand skill of a player written by [`Self::add_player`].
    pub fn set_right_skill(&self, unit: u64, skill: SkillId) {
        let s = &self.offsets.skills;
        let Ok(list) = self.image.read_ptr(unit, self.offsets.unit.skill_list) else {
            return;
        };
        let record = self.skill_record(skill, 1);
        self.image.write_u64(list + s.right, record);
    }

    pub fn set_menu_byte(&self, index: usize, value: u8) {
        self.image
            .write_u8(Self::MODULE_BASE + self.offsets.ui + index as u64, value);
    }

    pub fn set_hover(&self, hovered: Option<(u32, u32)>) {
        let at = Self::MODULE_BASE + self.offsets.hover;
        let (flag, unit_type, unit_id) = match hovered {
            Some((unit_type, unit_id)) => (1u16, unit_type, unit_id),
            None => (0, 0, 0),
        };
        self.image.write_u16(at, flag);
        self.image.write_u32(at + 0x04, unit_type);
        self.image.write_u32(at + 0x08, unit_id);
    }

    // ---- record helpers ----

    fn record(&self) -> u64 {
        self.image.alloc(RECORD_LEN)
    }

    fn unit_record(&self, kind: UnitKind, txt_id: u32, unit_id: u32) -> u64 {
        let u = &self.offsets.unit;
        let unit = self.record();
        self.image.write_u32(unit + u.kind, kind.table_index() as u32);
        self.image.write_u32(unit + u.txt_id, txt_id);
        self.image.write_u32(unit + u.unit_id, unit_id);
        unit
    }

    /// Prepends `unit` to its hash bucket chain.
    fn link(&self, kind: UnitKind, unit_id: u32, unit: u64) {
        let bucket = u64::from(unit_id) % Offsets::BUCKETS_PER_KIND;
        let slot = Self::MODULE_BASE
            + self.offsets.unit_table
            + (kind.table_index() * Offsets::BUCKETS_PER_KIND + bucket) * 8;
        let head = self.image.read_u64(slot, 0).unwrap_or(0);
        self.image.write_u64(unit + self.offsets.unit.next, head);
        self.image.write_u64(slot, unit);
    }

    fn write_dynamic_path(&self, unit: u64, position: Position, area: Area) {
        let p = &self.offsets.path;
        let path = self.record();
        let room = self.record();
        let room_ex = self.record();
        let level = self.record();
        self.image.write_u16(path + p.x, position.x as u16);
        self.image.write_u16(path + p.y, position.y as u16);
        self.image.write_u64(path + p.room, room);
        self.image.write_u64(room + p.room_ex, room_ex);
        self.image.write_u64(room_ex + p.level, level);
        self.image.write_u32(level + p.level_area, area.0.into());
        self.image.write_u64(unit + self.offsets.unit.path, path);
    }

    fn write_static_path(&self, unit: u64, position: Position) {
        let p = &self.offsets.path;
        let path = self.record();
        self.image.write_u32(path + p.static_x, position.x as u32);
        self.image.write_u32(path + p.static_y, position.y as u32);
        self.image.write_u64(unit + self.offsets.unit.path, path);
    }

    fn write_stats(&self, unit: u64, stats: &[(StatKind, u32)]) {
        let s = &self.offsets.stats;
        let list = self.record();
        let array = self.record();
        for (i, (kind, raw)) in stats.iter().enumerate() {
            let entry = array + i as u64 * 8;
            self.image.write_u16(entry + 2, kind.0);
            self.image.write_u32(entry + 4, *raw);
        }
        self.image.write_u64(list + s.array, array);
        self.image.write_u32(list + s.count, stats.len() as u32);
        self.image.write_u64(unit + self.offsets.unit.stat_list, list);
    }

    fn skill_record(&self, skill: SkillId, level: u8) -> u64 {
        let s = &self.offsets.skills;
        let record = self.record();
        let txt = self.record();
        self.image.write_u16(txt + s.txt_id, skill.0);
        self.image.write_u64(record + s.txt, txt);
        self.image.write_u8(record + s.level, level);
        record
    }

    fn write_skills(&self, unit: u64, spec: &PlayerSpec) {
        let s = &self.offsets.skills;
        let list = self.record();

        let mut head = 0;
        for (skill, level) in spec.skills.iter().rev() {
            let record = self.skill_record(*skill, *level);
            self.image.write_u64(record + s.next, head);
            head = record;
        }
        self.image.write_u64(list + s.first, head);

        let left = self.skill_record(spec.left_skill, 1);
        let right = self.skill_record(spec.right_skill, 1);
        self.image.write_u64(list + s.left, left);
        self.image.write_u64(list + s.right, right);
        self.image.write_u64(unit + self.offsets.unit.skill_list, list);
    }
}

impl MemorySource for SyntheticGame {
    fn module_base(&self) -> super::source::Result<u64> {
        self.image.module_base()
    }

    fn read_bytes(&self, base: u64, offset: u64, len: usize) -> super::source::Result<Vec<u8>> {
        self.image.read_bytes(base, offset, len)
    }
}
