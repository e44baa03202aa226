mod common;

use std::time::Duration;

use common::*;
use game_core::{
    Area, CharacterClass, KeyBindings, Object, ObjectId, Objects, SkillId, StatKind, UnitId,
};
use runtime::{InteractPolicy, PoisonCleanse, StepError, interact_object, set_skill, set_skill_with};
use tokio::time::{Instant, sleep};

fn poisoned_harness(bindings: KeyBindings) -> Harness {
    let mut config = config(CharacterClass::Hammerdin);
    config.bindings = bindings;
    let mut snapshot = world_snapshot();
    snapshot.player.stats.set(StatKind::POISON_LENGTH, 40);
    harness_with(config, snapshot, |actions| actions)
}

/// Switching twice to the same skill presses the key once in total.
#[tokio::test]
async fn set_skill_presses_once() {
    let mut h = harness(config(CharacterClass::Hammerdin));
    h.ctx.refresh().await.expect("refresh");

    set_skill(&h.ctx, SkillId::CONCENTRATION).expect("bound skill");
    h.ctx.refresh().await.expect("refresh");
    set_skill(&h.ctx, SkillId::CONCENTRATION).expect("bound skill");

    assert_eq!(h.input.presses(), 1);
    assert_eq!(h.input.presses_of(CONCENTRATION_KEY), 1);
}

#[tokio::test]
async fn set_skill_is_noop_when_already_active() {
    let mut h = harness(config(CharacterClass::Hammerdin));
    h.world
        .update(|s| s.player.right_skill = SkillId::CONCENTRATION);
    h.ctx.refresh().await.expect("refresh");

    set_skill(&h.ctx, SkillId::CONCENTRATION).expect("bound skill");
    assert_eq!(h.input.presses(), 0);
}

#[tokio::test]
async fn missing_binding_is_an_error_unless_tolerated() {
    let h = harness(config(CharacterClass::Hammerdin));

    let err = set_skill(&h.ctx, SkillId::BATTLE_ORDERS).expect_err("unbound skill");
    assert!(matches!(
        err,
        StepError::MissingBinding {
            skill: SkillId::BATTLE_ORDERS
        }
    ));

    set_skill_with(&h.ctx, SkillId::BATTLE_ORDERS, true).expect("tolerated");
    assert_eq!(h.input.presses(), 0);
}

/// Poison that never clears bounds the routine by its duration.
#[tokio::test(start_paused = true)]
async fn cleanse_returns_after_duration() {
    let mut h = poisoned_harness(bindings());
    h.ctx.refresh().await.expect("refresh");

    let started = Instant::now();
    PoisonCleanse::new()
        .cleanse_poison(&mut h.ctx, Duration::from_secs(6))
        .await
        .expect("cleanse");
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_secs(6), "{elapsed:?}");
    assert!(elapsed < Duration::from_secs(6) + PoisonCleanse::POLL_INTERVAL, "{elapsed:?}");
    assert_eq!(h.input.presses_of(CLEANSING_KEY), 1);
    assert!(h.world.polls() >= 30);
}

/// Poison clearing early ends the routine at the next poll.
#[tokio::test(start_paused = true)]
async fn cleanse_stops_when_poison_clears() {
    let mut h = poisoned_harness(bindings());
    h.ctx.refresh().await.expect("refresh");

    let world = h.world.clone();
    tokio::spawn(async move {
        sleep(Duration::from_secs(1)).await;
        world.update(|s| {
            s.player.stats.remove(StatKind::POISON_LENGTH);
        });
    });

    let started = Instant::now();
    PoisonCleanse::new()
        .cleanse_poison(&mut h.ctx, Duration::from_secs(6))
        .await
        .expect("cleanse");
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_secs(1), "{elapsed:?}");
    assert!(elapsed <= Duration::from_millis(1400), "{elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn zero_duration_returns_immediately() {
    let mut h = poisoned_harness(bindings());
    h.ctx.refresh().await.expect("refresh");
    let polls = h.world.polls();

    let started = Instant::now();
    PoisonCleanse::new()
        .cleanse_poison(&mut h.ctx, Duration::ZERO)
        .await
        .expect("cleanse");

    assert_eq!(started.elapsed(), Duration::ZERO);
    assert_eq!(h.world.polls(), polls);
    assert_eq!(h.input.presses(), 0);
}

/// Without a Cleansing binding the routine logs and returns without waiting.
#[tokio::test(start_paused = true)]
async fn unbound_cleansing_aborts_quietly() {
    let mut h = poisoned_harness(KeyBindings::new());
    h.ctx.refresh().await.expect("refresh");

    let started = Instant::now();
    PoisonCleanse::new()
        .cleanse_poison(&mut h.ctx, Duration::from_secs(6))
        .await
        .expect("cleanse");

    assert_eq!(started.elapsed(), Duration::ZERO);
    assert_eq!(h.input.presses(), 0);
}

#[tokio::test]
async fn poison_detection_follows_decoded_duration() {
    let mut snapshot = world_snapshot();
    assert!(!PoisonCleanse::is_poisoned(&snapshot));
    snapshot.player.stats.set(StatKind::POISON_LENGTH, 1);
    assert!(PoisonCleanse::is_poisoned(&snapshot));
}

#[tokio::test(start_paused = true)]
async fn interaction_succeeds_when_predicate_holds() {
    let mut snapshot = world_snapshot();
    snapshot.objects = Objects::new(vec![Object {
        unit_id: UnitId(7),
        name: ObjectId::BAALS_PORTAL,
        position: near_anchor(0),
    }]);
    let mut h = harness_with(config(CharacterClass::Hammerdin), snapshot, |a| {
        a.with_portal(ObjectId::BAALS_PORTAL, Area::THE_WORLDSTONE_CHAMBER)
    });

    interact_object(
        &mut h.ctx,
        ObjectId::BAALS_PORTAL,
        |s| s.area() == Area::THE_WORLDSTONE_CHAMBER,
        InteractPolicy::default(),
    )
    .await
    .expect("portal reaches the chamber");
    assert_eq!(h.actions.count("interact"), 1);
}

#[tokio::test(start_paused = true)]
async fn interaction_gives_up_after_attempts() {
    let mut snapshot = world_snapshot();
    snapshot.objects = Objects::new(vec![Object {
        unit_id: UnitId(7),
        name: ObjectId::BAALS_PORTAL,
        position: near_anchor(0),
    }]);
    let mut h = harness_with(config(CharacterClass::Hammerdin), snapshot, |a| a);
    let policy = InteractPolicy {
        attempts: 3,
        settle: Duration::from_millis(100),
    };

    let err = interact_object(&mut h.ctx, ObjectId::BAALS_PORTAL, |_| false, policy)
        .await
        .expect_err("predicate never holds");
    assert!(matches!(
        err,
        StepError::InteractionFailed { attempts: 3, .. }
    ));
    assert_eq!(h.actions.count("interact"), 3);
}
