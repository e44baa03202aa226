//! Scripted throne used when no memory dump is configured.
use std::sync::Arc;

use game_core::{
    Area, CollisionGrid, KeyBindings, Monster, MonsterType, NpcId, Object, ObjectId, Objects,
    Position, SkillId, Stats, UnitId, WorldSnapshot,
};
use runtime::Baal;
use runtime::testing::{FakeReader, FakeWorld, RecordingActions, RecordingInput};

/// Seams of one demo session, all backed by the same fake world.
pub struct DemoSession {
    pub reader: FakeReader,
    pub actions: Arc<RecordingActions>,
    pub input: Arc<RecordingInput>,
}

pub fn demo_session(player: &str, bindings: &KeyBindings) -> DemoSession {
    let world = FakeWorld::new(town_snapshot(player));

    let mut next_id = 100;
    let mut spawn = |name: NpcId, kind: MonsterType, dx: i32, dy: i32| {
        next_id += 1;
        let anchor = Baal::THRONE_ANCHOR;
        Monster {
            unit_id: UnitId(next_id),
            name,
            kind,
            position: Position::new(anchor.x + dx, anchor.y + dy),
            stats: Stats::default(),
        }
    };

    world.populate(
        Area::THRONE_OF_DESTRUCTION,
        vec![spawn(NpcId::WARPED_SHAMAN, MonsterType::SuperUnique, 6, -4)],
    );
    world.queue_wave(vec![
        spawn(NpcId::BAAL_SUBJECT_MUMMY, MonsterType::SuperUnique, -5, 3),
        spawn(NpcId::BAAL_SUBJECT_MUMMY, MonsterType::Minion, -7, 4),
    ]);
    world.queue_wave(vec![spawn(NpcId::COUNCIL_MEMBER_BALL, MonsterType::SuperUnique, 8, 2)]);
    world.queue_wave(vec![spawn(NpcId::VENOM_LORD_2, MonsterType::SuperUnique, 3, 9)]);
    world.queue_wave(vec![
        spawn(NpcId::BAALS_MINION, MonsterType::Minion, -4, -6),
        spawn(NpcId::BAALS_MINION, MonsterType::Minion, 4, -6),
    ]);
    world.populate(
        Area::THE_WORLDSTONE_CHAMBER,
        vec![spawn(NpcId::BAAL_CRAB, MonsterType::Unique, 42, 914)],
    );

    let actions = RecordingActions::new(world.clone())
        .with_portal(ObjectId::BAALS_PORTAL, Area::THE_WORLDSTONE_CHAMBER);

    DemoSession {
        reader: FakeReader::new(world.clone()),
        actions: Arc::new(actions),
        input: Arc::new(RecordingInput::new(world, bindings)),
    }
}

fn town_snapshot(player: &str) -> WorldSnapshot {
    let anchor = Baal::THRONE_ANCHOR;
    let mut snapshot = WorldSnapshot::default();
    snapshot.player.name = player.to_owned();
    snapshot.player.area = Area::HARROGATH;
    snapshot.player.right_skill = SkillId::ATTACK;
    snapshot.area_origin = Position::new(anchor.x - 100, anchor.y - 100);
    snapshot.collision_grid = CollisionGrid::new(300, 1100, vec![true; 300 * 1100]);
    snapshot.objects = Objects::new(vec![Object {
        unit_id: UnitId(1),
        name: ObjectId::BAALS_PORTAL,
        position: Position::new(anchor.x + 30, anchor.y - 20),
    }]);
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{BotConfig, CharacterClass};
    use runtime::{Run, SessionContext};

    #[tokio::test(start_paused = true)]
    async fn demo_throne_completes_a_baal_run() {
        let mut config = BotConfig::default();
        config.character.name = "demo".into();
        config.character.class = CharacterClass::Hammerdin;
        config.bindings = KeyBindings::new()
            .with(SkillId::CONCENTRATION, "F1")
            .with(SkillId::CLEANSING, "F5")
            .with(SkillId::SALVATION, "F6");

        let session = demo_session("demo", &config.bindings);
        let input = Arc::clone(&session.input);
        let mut ctx = SessionContext::builder("demo")
            .config(config)
            .reader(session.reader)
            .actions(session.actions)
            .input(session.input)
            .build()
            .unwrap();

        Baal::new().run(&mut ctx).await.unwrap();

        assert_eq!(ctx.snapshot().area(), Area::THE_WORLDSTONE_CHAMBER);
        assert_eq!(input.attacks(), 8);
        assert_eq!(input.presses_of("F5"), 1);
        assert_eq!(input.presses_of("F6"), 1);
    }
}
