mod common;

use std::time::Duration;

use common::*;
use game_core::{Area, CharacterClass, MonsterType, NpcId, Object, ObjectId, Objects, UnitId};
use runtime::testing::ActionCall;
use runtime::{Baal, Run, RunError};
use tokio::time::Instant;

/// Souls at the throne abort the run before any engagement action.
#[tokio::test(start_paused = true)]
async fn guard_aborts_before_engaging() {
    let mut config = config(CharacterClass::Hammerdin);
    config.game.baal.soul_quit = true;
    config.companion.leader = true;
    let mut h = harness(config);
    h.world.populate(
        Area::THRONE_OF_DESTRUCTION,
        vec![monster(1, NpcId::BURNING_SOUL_2, MonsterType::None, near_anchor(20))],
    );

    let err = Baal::new()
        .run(&mut h.ctx)
        .await
        .expect_err("guard should abort the run");

    assert!(matches!(
        err,
        RunError::GuardTriggered {
            found: NpcId::BURNING_SOUL_2
        }
    ));
    assert_eq!(
        h.actions.calls(),
        vec![
            ActionCall::WaypointTo(Area::THE_WORLDSTONE_KEEP_LEVEL_2),
            ActionCall::MoveToArea(Area::THE_WORLDSTONE_KEEP_LEVEL_3),
            ActionCall::MoveToArea(Area::THRONE_OF_DESTRUCTION),
            ActionCall::MoveTo(Baal::THRONE_ANCHOR),
        ]
    );
    assert_eq!(h.input.attacks(), 0);
}

/// Dolls alone do not trip the soul guard.
#[tokio::test(start_paused = true)]
async fn disabled_guard_family_is_ignored() {
    let mut config = config(CharacterClass::Hammerdin);
    config.game.baal.soul_quit = true;
    let mut h = harness(config);
    h.world.populate(
        Area::THRONE_OF_DESTRUCTION,
        vec![
            monster(1, NpcId::UNDEAD_STYGIAN_DOLL_2, MonsterType::None, near_anchor(5)),
            monster(2, NpcId::BAALS_MINION, MonsterType::Minion, near_anchor(8)),
        ],
    );

    Baal::new()
        .run(&mut h.ctx)
        .await
        .expect("run should complete");
    assert_eq!(h.actions.count("clear_area_around_player"), 1);
}

/// Only the final-wave signature ever appears: the loop ends after one pass.
#[tokio::test(start_paused = true)]
async fn final_wave_alone_ends_the_loop() {
    let mut h = harness(config(CharacterClass::Hammerdin));
    h.world.populate(
        Area::THRONE_OF_DESTRUCTION,
        vec![monster(1, NpcId::BAALS_MINION, MonsterType::Minion, near_anchor(3))],
    );

    Baal::new()
        .run(&mut h.ctx)
        .await
        .expect("run should complete");

    assert_eq!(h.input.attacks(), 1);
    assert_eq!(h.input.presses_of(CLEANSING_KEY), 0);
    assert_eq!(h.input.presses_of(SALVATION_KEY), 0);
    assert!(h.actions.calls().contains(&ActionCall::ClearAroundPlayer(29)));
    assert_eq!(h.actions.count("buff"), 1);
    assert_eq!(h.actions.count("interact"), 0);
}

/// The wave-2 contingency fires once even though later polls still report wave 2.
#[tokio::test(start_paused = true)]
async fn contingency_fires_once_per_wave() {
    let mut h = harness(config(CharacterClass::Hammerdin));
    h.world.populate(
        Area::THRONE_OF_DESTRUCTION,
        vec![monster(
            1,
            NpcId::BAAL_SUBJECT_MUMMY,
            MonsterType::SuperUnique,
            near_anchor(4),
        )],
    );
    h.world.queue_wave(Vec::new());
    h.world.queue_wave(vec![monster(
        2,
        NpcId::BAALS_MINION,
        MonsterType::Minion,
        near_anchor(6),
    )]);

    Baal::new()
        .run(&mut h.ctx)
        .await
        .expect("run should complete");

    assert_eq!(h.input.presses_of(CLEANSING_KEY), 1);
    assert_eq!(h.input.attacks(), 2);
}

/// Wave 3 switches to Salvation and holds it before the next wave.
#[tokio::test(start_paused = true)]
async fn wave_three_holds_salvation() {
    let mut h = harness(config(CharacterClass::Hammerdin));
    h.world.populate(
        Area::THRONE_OF_DESTRUCTION,
        vec![monster(
            1,
            NpcId::COUNCIL_MEMBER_BALL,
            MonsterType::SuperUnique,
            near_anchor(4),
        )],
    );
    h.world.queue_wave(vec![monster(
        2,
        NpcId::BAALS_MINION,
        MonsterType::Minion,
        near_anchor(6),
    )]);

    let started = Instant::now();
    Baal::new()
        .run(&mut h.ctx)
        .await
        .expect("run should complete");

    assert_eq!(h.input.presses_of(SALVATION_KEY), 1);
    assert_eq!(h.input.presses_of(CLEANSING_KEY), 0);
    assert!(started.elapsed() >= Duration::from_secs(5));
}

/// The sorceress has no contingency; clearing waves never presses aura keys.
#[tokio::test(start_paused = true)]
async fn sorceress_has_no_contingency() {
    let mut h = harness(config(CharacterClass::BlizzardSorceress));
    h.world.populate(
        Area::THRONE_OF_DESTRUCTION,
        vec![monster(
            1,
            NpcId::BAAL_SUBJECT_MUMMY,
            MonsterType::SuperUnique,
            near_anchor(4),
        )],
    );
    h.world.queue_wave(vec![monster(
        2,
        NpcId::BAALS_MINION,
        MonsterType::Minion,
        near_anchor(6),
    )]);

    Baal::new()
        .run(&mut h.ctx)
        .await
        .expect("run should complete");

    assert_eq!(h.input.presses_of(CLEANSING_KEY), 0);
    assert_eq!(h.input.presses_of(BLIZZARD_KEY), 1);
}

/// Monsters outside the wave radius are left alone.
#[tokio::test(start_paused = true)]
async fn distant_monsters_are_not_wave_targets() {
    let mut h = harness(config(CharacterClass::Hammerdin));
    h.world.populate(
        Area::THRONE_OF_DESTRUCTION,
        vec![
            monster(1, NpcId::BAALS_MINION, MonsterType::Minion, near_anchor(60)),
            monster(2, NpcId::BAALS_MINION, MonsterType::Minion, near_anchor(10)),
        ],
    );

    Baal::new()
        .run(&mut h.ctx)
        .await
        .expect("run should complete");

    assert_eq!(h.input.attacks(), 1);
    assert_eq!(h.world.snapshot().monsters.len(), 1);
}

/// With `kill_baal`, the run takes the portal and kills Baal in the chamber.
#[tokio::test(start_paused = true)]
async fn kills_baal_through_the_portal() {
    let mut config = config(CharacterClass::Hammerdin);
    config.game.baal.kill_baal = true;

    let mut snapshot = world_snapshot();
    snapshot.objects = Objects::new(vec![Object {
        unit_id: UnitId(900),
        name: ObjectId::BAALS_PORTAL,
        position: near_anchor(30),
    }]);
    let mut h = harness_with(config, snapshot, |actions| {
        actions.with_portal(ObjectId::BAALS_PORTAL, Area::THE_WORLDSTONE_CHAMBER)
    });
    h.world.populate(
        Area::THRONE_OF_DESTRUCTION,
        vec![monster(1, NpcId::BAALS_MINION, MonsterType::Minion, near_anchor(3))],
    );
    h.world.populate(
        Area::THE_WORLDSTONE_CHAMBER,
        vec![monster(
            99,
            NpcId::BAAL_CRAB,
            MonsterType::Unique,
            Baal::CHAMBER_ENTRY,
        )],
    );

    Baal::new()
        .run(&mut h.ctx)
        .await
        .expect("run should complete");

    let calls = h.actions.calls();
    assert!(calls.contains(&ActionCall::Interact(ObjectId::BAALS_PORTAL)));
    assert!(calls.contains(&ActionCall::MoveTo(Baal::CHAMBER_ENTRY)));
    assert_eq!(h.actions.count("buff"), 2);
    assert_eq!(h.world.snapshot().player.area, Area::THE_WORLDSTONE_CHAMBER);
    assert_eq!(h.input.attacks(), 2);
}

/// A missing portal is reported rather than retried forever.
#[tokio::test(start_paused = true)]
async fn missing_portal_fails_the_kill() {
    let mut config = config(CharacterClass::Hammerdin);
    config.game.baal.kill_baal = true;
    let mut h = harness(config);
    h.world.populate(
        Area::THRONE_OF_DESTRUCTION,
        vec![monster(1, NpcId::BAALS_MINION, MonsterType::Minion, near_anchor(3))],
    );

    let err = Baal::new()
        .run(&mut h.ctx)
        .await
        .expect_err("portal is absent");
    assert!(matches!(
        err,
        RunError::Step(runtime::StepError::ObjectNotFound {
            object: ObjectId::BAALS_PORTAL
        })
    ));
}

/// Travel failures surface verbatim and stop the run immediately.
#[tokio::test(start_paused = true)]
async fn navigation_failure_propagates() {
    let mut h = harness_with(config(CharacterClass::Hammerdin), world_snapshot(), |a| {
        a.failing("waypoint_to")
    });

    let err = Baal::new()
        .run(&mut h.ctx)
        .await
        .expect_err("waypoint fails");

    assert!(matches!(err, RunError::Navigation(ref e) if e.action == "waypoint_to"));
    assert_eq!(h.actions.calls().len(), 1);
}

/// Floor clearing follows configuration, and an override filter wins.
#[tokio::test(start_paused = true)]
async fn floor_clearing_honors_configuration() {
    let mut config = config(CharacterClass::Hammerdin);
    config.game.baal.clear_floors = true;
    config.game.baal.only_elites = true;
    let mut h = harness(config.clone());
    h.world.populate(
        Area::THRONE_OF_DESTRUCTION,
        vec![monster(1, NpcId::BAALS_MINION, MonsterType::Minion, near_anchor(3))],
    );

    Baal::new()
        .run(&mut h.ctx)
        .await
        .expect("run should complete");
    let clears: Vec<_> = h
        .actions
        .calls()
        .into_iter()
        .filter(|c| matches!(c, ActionCall::ClearCurrentLevel { .. }))
        .collect();
    assert_eq!(
        clears,
        vec![ActionCall::ClearCurrentLevel { elites_only: true }; 2]
    );

    let mut h = harness(config);
    h.world.populate(
        Area::THRONE_OF_DESTRUCTION,
        vec![monster(1, NpcId::BAALS_MINION, MonsterType::Minion, near_anchor(3))],
    );
    Baal::with_clear_filter(game_core::MonsterFilter::Any)
        .run(&mut h.ctx)
        .await
        .expect("run should complete");
    assert!(
        h.actions
            .calls()
            .contains(&ActionCall::ClearCurrentLevel { elites_only: false })
    );
}

/// An empty throne times out instead of waiting forever.
#[tokio::test(start_paused = true)]
async fn idle_throne_times_out() {
    let mut config = config(CharacterClass::Hammerdin);
    config.timing.wave_idle_timeout_secs = 3;
    let mut h = harness(config);

    let err = Baal::new()
        .run(&mut h.ctx)
        .await
        .expect_err("no wave ever spawns");
    assert!(matches!(err, RunError::WaveTimeout(d) if d == Duration::from_secs(3)));
}
