#![allow(dead_code)]

use std::sync::Arc;

use game_core::{
    Area, BotConfig, CharacterClass, CollisionGrid, KeyBindings, Monster, MonsterType, NpcId,
    Position, SkillId, Stats, UnitId, WorldSnapshot,
};
use runtime::testing::{FakeReader, FakeWorld, RecordingActions, RecordingInput};
use runtime::{Baal, SessionContext};

pub const CONCENTRATION_KEY: &str = "F1";
pub const BLIZZARD_KEY: &str = "F2";
pub const CLEANSING_KEY: &str = "F5";
pub const SALVATION_KEY: &str = "F6";

pub struct Harness {
    pub world: FakeWorld,
    pub actions: Arc<RecordingActions>,
    pub input: Arc<RecordingInput>,
    pub ctx: SessionContext,
}

pub fn bindings() -> KeyBindings {
    KeyBindings::new()
        .with(SkillId::CONCENTRATION, CONCENTRATION_KEY)
        .with(SkillId::BLIZZARD, BLIZZARD_KEY)
        .with(SkillId::CLEANSING, CLEANSING_KEY)
        .with(SkillId::SALVATION, SALVATION_KEY)
}

pub fn config(class: CharacterClass) -> BotConfig {
    let mut config = BotConfig::default();
    config.character.name = "tester".into();
    config.character.class = class;
    config.bindings = bindings();
    config.game.baal.kill_baal = false;
    config
}

/// Player standing in town with a fully walkable grid around the throne.
pub fn world_snapshot() -> WorldSnapshot {
    let anchor = Baal::THRONE_ANCHOR;
    let mut snapshot = WorldSnapshot::default();
    snapshot.player.name = "tester".into();
    snapshot.player.area = Area::HARROGATH;
    snapshot.player.right_skill = SkillId::ATTACK;
    snapshot.area_origin = Position::new(anchor.x - 100, anchor.y - 100);
    snapshot.collision_grid = CollisionGrid::new(200, 200, vec![true; 200 * 200]);
    snapshot
}

pub fn monster(id: u32, name: NpcId, kind: MonsterType, position: Position) -> Monster {
    Monster {
        unit_id: UnitId(id),
        name,
        kind,
        position,
        stats: Stats::default(),
    }
}

/// Position `dx` tiles east of the throne anchor.
pub fn near_anchor(dx: i32) -> Position {
    let anchor = Baal::THRONE_ANCHOR;
    Position::new(anchor.x + dx, anchor.y)
}

pub fn harness(config: BotConfig) -> Harness {
    harness_with(config, world_snapshot(), |actions| actions)
}

pub fn harness_with(
    config: BotConfig,
    snapshot: WorldSnapshot,
    configure: impl FnOnce(RecordingActions) -> RecordingActions,
) -> Harness {
    let world = FakeWorld::new(snapshot);
    let actions = Arc::new(configure(RecordingActions::new(world.clone())));
    let input = Arc::new(RecordingInput::new(world.clone(), &config.bindings));
    let ctx = SessionContext::builder("test")
        .config(config)
        .reader(FakeReader::new(world.clone()))
        .actions(actions.clone())
        .input(input.clone())
        .build()
        .expect("context should build");
    Harness {
        world,
        actions,
        input,
        ctx,
    }
}
