//! Snapshot decoding from raw game memory.
use std::collections::BTreeMap;
use std::sync::Arc;

use byteorder::{ByteOrder, LittleEndian};
use game_core::layout::{MenuOffsets, StatListOffsets};
use game_core::{
    Anomaly, Area, Corpse, Difficulty, HoverData, Item, ItemFlags, ItemId, ItemLocation,
    ItemQuality, Monster, MonsterType, Monsters, NpcId, Object, ObjectId, Objects, Offsets,
    OpenMenus, PlayerUnit, Position, SkillId, Stats, UnitId, UnitKind, WorldSnapshot,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::cache::SessionCache;
use super::map::{MapError, StaticMapService};
use super::source::{MemoryError, MemoryReadExt, MemorySource};
use super::stats::decode_stat_entries;

#[derive(Debug, Error)]
pub enum ReaderError {
    /// No local player unit resolves; there is no active game session.
    #[error("no game session attached")]
    NotAttached,

    #[error("failed to read session seed")]
    Seed(#[source] MemoryError),

    #[error(transparent)]
    Map(#[from] MapError),
}

pub type Result<T> = std::result::Result<T, ReaderError>;

/// Monster data flag bits, checked in rank order.
const MONSTER_RANKS: [(u8, MonsterType); 4] = [
    (0x02, MonsterType::SuperUnique),
    (0x08, MonsterType::Unique),
    (0x04, MonsterType::Champion),
    (0x10, MonsterType::Minion),
];

/// Decodes [`WorldSnapshot`]s from a [`MemorySource`].
///
/// Owns the [`SessionCache`]: `poll(true)` rebuilds it (player unit, seed and
/// one static map fetch); `poll(false)` reuses it verbatim.
pub struct StateReader<M, S> {
    memory: M,
    maps: S,
    offsets: Offsets,
    difficulty: Difficulty,
    cache: Option<SessionCache>,
}

impl<M, S> StateReader<M, S>
where
    M: MemorySource,
    S: StaticMapService,
{
    pub fn new(memory: M, maps: S, offsets: Offsets, difficulty: Difficulty) -> Self {
        Self {
            memory,
            maps,
            offsets,
            difficulty,
            cache: None,
        }
    }

    pub fn cache(&self) -> Option<&SessionCache> {
        self.cache.as_ref()
    }

    /// True iff a local player unit can be resolved right now.
    pub fn is_attached(&self) -> bool {
        self.find_player_unit().is_some()
    }

    /// Decodes a fresh snapshot.
    ///
    /// With `new_session` (or when no session has been cached yet) the session
    /// cache is rebuilt first. Fails with [`ReaderError::NotAttached`] when the
    /// player unit no longer resolves; a stale snapshot is never returned.
    pub async fn poll(&mut self, new_session: bool) -> Result<WorldSnapshot> {
        if new_session || self.cache.is_none() {
            self.cache = None;
            let cache = self.start_session().await?;
            self.cache = Some(cache);
        }
        let Some(cache) = self.cache.as_ref() else {
            return Err(ReaderError::NotAttached);
        };

        let mut anomalies = Vec::new();
        let player = self
            .decode_player(cache.player_unit, &mut anomalies)
            .ok_or(ReaderError::NotAttached)?;

        let area = player.area;
        let origin = match cache.map.origin(area) {
            Some(origin) => origin,
            None => {
                warn!(%area, "no cached map data for current area");
                anomalies.push(Anomaly::MissingAreaMap { area });
                Position::ORIGIN
            }
        };
        let (npcs, adjacent_levels) = cache.map.npcs_and_exits(area);
        let collision_grid = cache.map.collision_grid(area);

        let monsters = self.decode_monsters(&mut anomalies);
        let items = self.decode_items(&mut anomalies);
        let objects = self.decode_objects(&mut anomalies);
        let (open_menus, hover) = self.decode_ui(&mut anomalies);

        debug!(
            %area,
            position = %player.position,
            monsters = monsters.len(),
            items = items.len(),
            objects = objects.len(),
            anomalies = anomalies.len(),
            "snapshot decoded"
        );

        Ok(WorldSnapshot {
            player,
            monsters,
            npcs,
            items,
            objects,
            collision_grid,
            area_origin: origin,
            adjacent_levels,
            open_menus,
            corpse: Corpse::default(),
            hover,
            anomalies,
        })
    }

    async fn start_session(&self) -> Result<SessionCache> {
        let player_unit = self.find_player_unit().ok_or(ReaderError::NotAttached)?;
        let act = self
            .memory
            .read_ptr(player_unit, self.offsets.unit.act)
            .map_err(ReaderError::Seed)?;
        let map_seed = self
            .memory
            .read_u32(act, self.offsets.unit.act_map_seed)
            .map_err(ReaderError::Seed)?;

        let map = self
            .maps
            .fetch(&map_seed.to_string(), self.difficulty)
            .await?;
        info!(
            map_seed,
            difficulty = %self.difficulty,
            areas = map.areas.len(),
            "new session cached"
        );

        Ok(SessionCache {
            player_unit,
            map_seed,
            map: Arc::new(map),
        })
    }

    // ---- unit table ----

    /// Addresses of every unit of `kind` reachable from the hash table.
    fn walk_units(&self, kind: UnitKind, anomalies: &mut Vec<Anomaly>) -> Vec<u64> {
        let Ok(module) = self.memory.module_base() else {
            return Vec::new();
        };
        let table_offset = self.offsets.unit_table
            + kind.table_index() * Offsets::BUCKETS_PER_KIND * 8;
        let Ok(buckets) = self.memory.read_bytes(
            module,
            table_offset,
            Offsets::BUCKETS_PER_KIND as usize * 8,
        ) else {
            return Vec::new();
        };

        let mut units = Vec::new();
        for (bucket, head) in buckets.chunks_exact(8).enumerate() {
            let mut unit = LittleEndian::read_u64(head);
            let mut walked = 0;
            while unit != 0 {
                if walked == self.offsets.max_bucket_chain {
                    anomalies.push(Anomaly::UnitChainTruncated {
                        kind,
                        bucket: bucket as u32,
                    });
                    break;
                }
                units.push(unit);
                walked += 1;
                unit = match self.memory.read_u64(unit, self.offsets.unit.next) {
                    Ok(next) => next,
                    Err(_) => {
                        anomalies.push(Anomaly::UnreadableUnit {
                            kind,
                            address: unit,
                        });
                        break;
                    }
                };
            }
        }
        units
    }

    fn find_player_unit(&self) -> Option<u64> {
        let mut ignored = Vec::new();
        self.walk_units(UnitKind::Player, &mut ignored)
            .into_iter()
            .find(|&unit| self.is_local_player(unit))
    }

    fn is_local_player(&self, unit: u64) -> bool {
        self.memory
            .read_ptr(unit, self.offsets.unit.inventory)
            .and_then(|inventory| {
                self.memory
                    .read_u8(inventory, self.offsets.unit.inventory_local_flag)
            })
            .is_ok_and(|flag| flag != 0)
    }

    // ---- shared record fields ----

    fn unit_id(&self, unit: u64) -> std::result::Result<UnitId, MemoryError> {
        self.memory
            .read_u32(unit, self.offsets.unit.unit_id)
            .map(UnitId)
    }

    /// `Ok(None)` when the id does not fit the txt tables; the unit is skipped.
    fn txt_id(
        &self,
        unit: u64,
        kind: UnitKind,
        unit_id: UnitId,
        anomalies: &mut Vec<Anomaly>,
    ) -> std::result::Result<Option<u16>, MemoryError> {
        let raw = self.memory.read_u32(unit, self.offsets.unit.txt_id)?;
        match u16::try_from(raw) {
            Ok(id) => Ok(Some(id)),
            Err(_) => {
                warn!(%kind, unit = %unit_id, raw, "txt id out of range, skipping unit");
                anomalies.push(Anomaly::TxtIdOutOfRange {
                    kind,
                    unit: unit_id,
                    raw,
                });
                Ok(None)
            }
        }
    }

    fn dynamic_position(&self, unit: u64) -> std::result::Result<Position, MemoryError> {
        let path = self.memory.read_ptr(unit, self.offsets.unit.path)?;
        let x = self.memory.read_u16(path, self.offsets.path.x)?;
        let y = self.memory.read_u16(path, self.offsets.path.y)?;
        Ok(Position::new(x.into(), y.into()))
    }

    fn static_position(&self, unit: u64) -> std::result::Result<Position, MemoryError> {
        let path = self.memory.read_ptr(unit, self.offsets.unit.path)?;
        let x = self.memory.read_u32(path, self.offsets.path.static_x)?;
        let y = self.memory.read_u32(path, self.offsets.path.static_y)?;
        Ok(Position::new(x as i32, y as i32))
    }

    /// Out-of-range area ids decode as [`Area::NONE`] and are reported.
    fn area(
        &self,
        unit: u64,
        unit_id: UnitId,
        anomalies: &mut Vec<Anomaly>,
    ) -> std::result::Result<Area, MemoryError> {
        let p = &self.offsets.path;
        let path = self.memory.read_ptr(unit, self.offsets.unit.path)?;
        let room = self.memory.read_ptr(path, p.room)?;
        let room_ex = self.memory.read_ptr(room, p.room_ex)?;
        let level = self.memory.read_ptr(room_ex, p.level)?;
        let raw = self.memory.read_u32(level, p.level_area)?;
        Ok(u16::try_from(raw).map(Area).unwrap_or_else(|_| {
            warn!(unit = %unit_id, raw, "area id out of range");
            anomalies.push(Anomaly::AreaOutOfRange { unit: unit_id, raw });
            Area::NONE
        }))
    }

    fn stats(&self, unit: u64, id: UnitId, anomalies: &mut Vec<Anomaly>) -> Stats {
        match self.read_stat_entries(unit) {
            Ok(bytes) => decode_stat_entries(id, &bytes, anomalies),
            Err(err) => {
                debug!(unit = %id, %err, "stat list unreadable");
                anomalies.push(Anomaly::UnreadableStats { unit: id });
                Stats::default()
            }
        }
    }

    fn read_stat_entries(&self, unit: u64) -> std::result::Result<Vec<u8>, MemoryError> {
        let s = &self.offsets.stats;
        let list = self.memory.read_ptr(unit, self.offsets.unit.stat_list)?;
        let count = self.memory.read_u32(list, s.count)?.min(s.max_entries);
        if count == 0 {
            return Ok(Vec::new());
        }
        let array = self.memory.read_ptr(list, s.array)?;
        self.memory
            .read_bytes(array, 0, count as usize * StatListOffsets::ENTRY_LEN)
    }

    // ---- player ----

    fn decode_player(&self, unit: u64, anomalies: &mut Vec<Anomaly>) -> Option<PlayerUnit> {
        if !self.is_local_player(unit) {
            return None;
        }
        let unit_id = self.unit_id(unit).ok()?;
        let position = self.dynamic_position(unit).ok()?;
        let area = self.area(unit, unit_id, anomalies).ok()?;

        let name = self
            .memory
            .read_ptr(unit, self.offsets.unit.unit_data)
            .and_then(|data| {
                self.memory.read_c_string(
                    data,
                    self.offsets.unit.player_name,
                    self.offsets.unit.player_name_len,
                )
            })
            .unwrap_or_default();
        let stats = self.stats(unit, unit_id, anomalies);

        let mut player = PlayerUnit {
            unit_id,
            name,
            area,
            position,
            stats,
            ..PlayerUnit::default()
        };
        if let Err(err) = self.decode_skills(unit, &mut player) {
            debug!(%err, "skill list unreadable");
        }
        Some(player)
    }

    fn decode_skills(
        &self,
        unit: u64,
        player: &mut PlayerUnit,
    ) -> std::result::Result<(), MemoryError> {
        let s = &self.offsets.skills;
        let list = self.memory.read_ptr(unit, self.offsets.unit.skill_list)?;

        let skill_id = |skill: u64| -> std::result::Result<SkillId, MemoryError> {
            let txt = self.memory.read_ptr(skill, s.txt)?;
            self.memory.read_u16(txt, s.txt_id).map(SkillId)
        };

        let mut skills = BTreeMap::new();
        let mut skill = self.memory.read_u64(list, s.first)?;
        let mut walked = 0;
        while skill != 0 && walked < s.max_skills {
            let level = self.memory.read_u8(skill, s.level)?;
            skills.insert(skill_id(skill)?, level);
            skill = self.memory.read_u64(skill, s.next)?;
            walked += 1;
        }
        player.skills = skills;

        if let Ok(left) = self.memory.read_ptr(list, s.left) {
            player.left_skill = skill_id(left)?;
        }
        if let Ok(right) = self.memory.read_ptr(list, s.right) {
            player.right_skill = skill_id(right)?;
        }
        Ok(())
    }

    // ---- monsters, items, objects ----

    fn decode_monsters(&self, anomalies: &mut Vec<Anomaly>) -> Monsters {
        let kind = UnitKind::Monster;
        let mut monsters = Vec::new();
        for unit in self.walk_units(kind, anomalies) {
            match self.decode_monster(unit, anomalies) {
                Ok(Some(monster)) => monsters.push(monster),
                Ok(None) => {}
                Err(_) => anomalies.push(Anomaly::UnreadableUnit {
                    kind,
                    address: unit,
                }),
            }
        }
        Monsters::new(monsters)
    }

    /// `Ok(None)` for dead or dying monsters.
    fn decode_monster(
        &self,
        unit: u64,
        anomalies: &mut Vec<Anomaly>,
    ) -> std::result::Result<Option<Monster>, MemoryError> {
        let mode = self.memory.read_u32(unit, self.offsets.unit.mode)?;
        if self.offsets.monster.dead_modes.contains(&mode) {
            return Ok(None);
        }
        let unit_id = self.unit_id(unit)?;
        let Some(txt) = self.txt_id(unit, UnitKind::Monster, unit_id, anomalies)? else {
            return Ok(None);
        };
        let name = NpcId(txt);
        let position = self.dynamic_position(unit)?;

        let data = self.memory.read_ptr(unit, self.offsets.unit.unit_data)?;
        let flags = self.memory.read_u8(data, self.offsets.monster.flags)?;
        let kind = MONSTER_RANKS
            .iter()
            .find(|(bit, _)| flags & bit != 0)
            .map(|(_, kind)| *kind)
            .unwrap_or_default();

        let stats = self.stats(unit, unit_id, anomalies);
        Ok(Some(Monster {
            unit_id,
            name,
            kind,
            position,
            stats,
        }))
    }

    fn decode_items(&self, anomalies: &mut Vec<Anomaly>) -> Vec<Item> {
        let kind = UnitKind::Item;
        let mut items = Vec::new();
        for unit in self.walk_units(kind, anomalies) {
            match self.decode_item(unit, anomalies) {
                Ok(Some(item)) => items.push(item),
                Ok(None) => {}
                Err(_) => anomalies.push(Anomaly::UnreadableUnit {
                    kind,
                    address: unit,
                }),
            }
        }
        items
    }

    fn decode_item(
        &self,
        unit: u64,
        anomalies: &mut Vec<Anomaly>,
    ) -> std::result::Result<Option<Item>, MemoryError> {
        let o = &self.offsets.item;
        let unit_id = self.unit_id(unit)?;
        let Some(txt) = self.txt_id(unit, UnitKind::Item, unit_id, anomalies)? else {
            return Ok(None);
        };
        let name = ItemId(txt);
        let position = self.static_position(unit)?;

        let data = self.memory.read_ptr(unit, self.offsets.unit.unit_data)?;
        let quality = ItemQuality::from_raw(self.memory.read_u32(data, o.quality)?);
        let location = ItemLocation::from_raw(self.memory.read_u32(data, o.location)?);
        let flags = ItemFlags::from_word(self.memory.read_u32(data, o.flags)?);

        let stats = self.stats(unit, unit_id, anomalies);
        Ok(Some(Item {
            unit_id,
            name,
            quality,
            location,
            position,
            flags,
            stats,
        }))
    }

    fn decode_objects(&self, anomalies: &mut Vec<Anomaly>) -> Objects {
        let kind = UnitKind::Object;
        let mut objects = Vec::new();
        for unit in self.walk_units(kind, anomalies) {
            match self.decode_object(unit, anomalies) {
                Ok(Some(object)) => objects.push(object),
                Ok(None) => {}
                Err(_) => anomalies.push(Anomaly::UnreadableUnit {
                    kind,
                    address: unit,
                }),
            }
        }
        Objects::new(objects)
    }

    fn decode_object(
        &self,
        unit: u64,
        anomalies: &mut Vec<Anomaly>,
    ) -> std::result::Result<Option<Object>, MemoryError> {
        let unit_id = self.unit_id(unit)?;
        let Some(txt) = self.txt_id(unit, UnitKind::Object, unit_id, anomalies)? else {
            return Ok(None);
        };
        Ok(Some(Object {
            unit_id,
            name: ObjectId(txt),
            position: self.static_position(unit)?,
        }))
    }

    // ---- ui ----

    fn decode_ui(&self, anomalies: &mut Vec<Anomaly>) -> (OpenMenus, HoverData) {
        let buffers = self.memory.module_base().and_then(|module| {
            let ui = self
                .memory
                .read_bytes(module, self.offsets.ui, Offsets::UI_BUFFER_LEN)?;
            let hover = self
                .memory
                .read_bytes(module, self.offsets.hover, Offsets::HOVER_BUFFER_LEN)?;
            Ok((ui, hover))
        });
        match buffers {
            Ok((ui, hover)) => (
                decode_menus(&ui, &self.offsets.menus),
                decode_hover(&hover),
            ),
            Err(err) => {
                debug!(%err, "ui buffers unreadable");
                anomalies.push(Anomaly::UnreadableUi);
                (OpenMenus::default(), HoverData::NONE)
            }
        }
    }
}

/// Decodes open menus from the UI flag buffer. Each menu is one byte.
pub fn decode_menus(buffer: &[u8], menus: &MenuOffsets) -> OpenMenus {
    let flag = |index: usize| buffer.get(index).is_some_and(|&b| b != 0);
    OpenMenus {
        inventory: flag(menus.inventory),
        npc_interact: flag(menus.npc_interact),
        npc_shop: flag(menus.npc_shop),
        stash: flag(menus.stash),
        waypoint: flag(menus.waypoint),
    }
}

/// Decodes the hover buffer. The leading `u16` gates the type and id fields.
pub fn decode_hover(buffer: &[u8]) -> HoverData {
    if buffer.len() < Offsets::HOVER_BUFFER_LEN || LittleEndian::read_u16(&buffer[0..2]) == 0 {
        return HoverData::NONE;
    }
    HoverData {
        is_hovered: true,
        unit_type: LittleEndian::read_u32(&buffer[0x04..0x08]),
        unit_id: UnitId(LittleEndian::read_u32(&buffer[0x08..0x0C])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menus_come_from_independent_bytes() {
        let menus = MenuOffsets::default();
        let mut buffer = [0u8; Offsets::UI_BUFFER_LEN];
        buffer[menus.inventory] = 1;
        buffer[menus.stash] = 0xFF;

        let open = decode_menus(&buffer, &menus);
        assert!(open.inventory);
        assert!(open.stash);
        assert!(!open.npc_interact);
        assert!(!open.npc_shop);
        assert!(!open.waypoint);
    }

    #[test]
    fn short_ui_buffer_reads_as_closed() {
        let open = decode_menus(&[1, 1], &MenuOffsets::default());
        assert!(open.inventory);
        assert!(!open.stash);
    }

    #[test]
    fn hover_requires_leading_flag() {
        let mut buffer = [0u8; Offsets::HOVER_BUFFER_LEN];
        buffer[0x04..0x08].copy_from_slice(&1u32.to_le_bytes());
        buffer[0x08..0x0C].copy_from_slice(&42u32.to_le_bytes());
        assert_eq!(decode_hover(&buffer), HoverData::NONE);

        buffer[0] = 1;
        assert_eq!(
            decode_hover(&buffer),
            HoverData {
                is_hovered: true,
                unit_type: 1,
                unit_id: UnitId(42),
            }
        );
    }
}
