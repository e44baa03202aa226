use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use game_core::{
    Anomaly, Area, AreaMap, CollisionGrid, Difficulty, MapData, MonsterType, NpcId, Offsets,
    Position, SkillId, StatKind,
};
use runtime::memory::{MonsterSpec, PlayerSpec};
use runtime::{MapError, ReaderError, StateReader, StaticMapService, SyntheticGame};

/// Map service that counts fetches and remembers the last seed.
#[derive(Default)]
struct CountingMaps {
    fetches: AtomicUsize,
    seeds: std::sync::Mutex<Vec<String>>,
}

#[async_trait]
impl StaticMapService for CountingMaps {
    async fn fetch(&self, seed: &str, _difficulty: Difficulty) -> Result<MapData, MapError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.seeds.lock().expect("seed log").push(seed.to_owned());

        let mut areas = BTreeMap::new();
        areas.insert(
            Area::THRONE_OF_DESTRUCTION,
            AreaMap {
                origin: Position::new(15000, 4950),
                grid: CollisionGrid::new(200, 200, vec![true; 200 * 200]),
                ..AreaMap::default()
            },
        );
        Ok(MapData::new(areas))
    }
}

fn reader(
    game: &SyntheticGame,
    maps: Arc<CountingMaps>,
) -> StateReader<Arc<runtime::MemoryImage>, Arc<CountingMaps>> {
    StateReader::new(game.image(), maps, Offsets::default(), Difficulty::Hell)
}

/// The static map is fetched once per session, not once per poll.
#[tokio::test]
async fn map_is_cached_between_polls() {
    let game = SyntheticGame::new(Offsets::default());
    game.add_player(&PlayerSpec {
        map_seed: 4242,
        ..PlayerSpec::default()
    });
    let maps = Arc::new(CountingMaps::default());
    let mut reader = reader(&game, maps.clone());

    reader.poll(true).await.expect("first poll");
    reader.poll(false).await.expect("second poll");
    reader.poll(false).await.expect("third poll");

    assert_eq!(maps.fetches.load(Ordering::SeqCst), 1);
    assert_eq!(*maps.seeds.lock().expect("seed log"), vec!["4242".to_owned()]);
    assert_eq!(reader.cache().map(|c| c.map_seed), Some(4242));

    reader.poll(true).await.expect("new session");
    assert_eq!(maps.fetches.load(Ordering::SeqCst), 2);
}

/// Polling without a session behaves like starting one.
#[tokio::test]
async fn first_poll_builds_the_cache() {
    let game = SyntheticGame::new(Offsets::default());
    game.add_player(&PlayerSpec::default());
    let maps = Arc::new(CountingMaps::default());
    let mut reader = reader(&game, maps.clone());

    assert!(reader.cache().is_none());
    reader.poll(false).await.expect("poll");
    assert!(reader.cache().is_some());
    assert_eq!(maps.fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn snapshot_reflects_memory() {
    let game = SyntheticGame::new(Offsets::default());
    game.add_player(&PlayerSpec {
        name: "hammer".into(),
        stats: vec![
            (StatKind::LIFE, 1200 << 8),
            (StatKind::POISON_LENGTH, 150),
            (StatKind::STRENGTH, 95),
        ],
        skills: vec![(SkillId::BLESSED_HAMMER, 20), (SkillId::CONCENTRATION, 20)],
        right_skill: SkillId::CONCENTRATION,
        ..PlayerSpec::default()
    });
    game.add_monster(&MonsterSpec::new(
        10,
        NpcId::WARPED_SHAMAN,
        MonsterType::SuperUnique,
        Position::new(15100, 5030),
    ));
    let dead = game.add_monster(&MonsterSpec::new(
        11,
        NpcId::BAALS_MINION,
        MonsterType::Minion,
        Position::new(15110, 5030),
    ));
    game.kill(dead);

    let mut reader = reader(&game, Arc::new(CountingMaps::default()));
    let snapshot = reader.poll(true).await.expect("poll");

    assert_eq!(snapshot.player.name, "hammer");
    assert_eq!(snapshot.area(), Area::THRONE_OF_DESTRUCTION);
    assert_eq!(snapshot.player.stat(StatKind::LIFE), 1200);
    assert_eq!(snapshot.player.stat(StatKind::POISON_LENGTH), 6);
    assert_eq!(snapshot.player.stat(StatKind::STRENGTH), 95);
    assert!(snapshot.is_poisoned());
    assert_eq!(snapshot.player.right_skill, SkillId::CONCENTRATION);
    assert!(snapshot.player.knows(SkillId::BLESSED_HAMMER));

    assert_eq!(snapshot.monsters.len(), 1);
    assert!(
        snapshot
            .monsters
            .find_one(NpcId::WARPED_SHAMAN, MonsterType::SuperUnique)
            .is_some()
    );
    assert_eq!(snapshot.area_origin, Position::new(15000, 4950));
    assert!(snapshot.is_walkable(Position::new(15100, 5030)));
    assert!(snapshot.is_clean(), "{:?}", snapshot.anomalies);
}

/// Unlisted stat kinds pass through and are recorded as anomalies.
#[tokio::test]
async fn unknown_stats_become_anomalies() {
    let game = SyntheticGame::new(Offsets::default());
    game.add_player(&PlayerSpec {
        stats: vec![(StatKind(999), 77)],
        ..PlayerSpec::default()
    });

    let mut reader = reader(&game, Arc::new(CountingMaps::default()));
    let snapshot = reader.poll(true).await.expect("poll");

    assert_eq!(snapshot.player.stat(StatKind(999)), 77);
    assert!(snapshot.anomalies.iter().any(|a| matches!(
        a,
        Anomaly::UnknownStat {
            kind: StatKind(999),
            raw: 77,
            ..
        }
    )));
}

/// Without a local player the reader is detached and never returns a snapshot.
#[tokio::test]
async fn missing_player_is_not_attached() {
    let game = SyntheticGame::new(Offsets::default());
    let mut reader = reader(&game, Arc::new(CountingMaps::default()));

    assert!(!reader.is_attached());
    assert!(matches!(
        reader.poll(true).await,
        Err(ReaderError::NotAttached)
    ));

    game.add_player(&PlayerSpec::default());
    assert!(reader.is_attached());
}

/// Losing the process mid-session fails the next poll instead of reusing data.
#[tokio::test]
async fn detached_process_fails_the_poll() {
    let game = SyntheticGame::new(Offsets::default());
    game.add_player(&PlayerSpec::default());
    let mut reader = reader(&game, Arc::new(CountingMaps::default()));
    reader.poll(true).await.expect("poll");

    game.image().set_attached(false);
    assert!(!reader.is_attached());
    assert!(matches!(
        reader.poll(false).await,
        Err(ReaderError::NotAttached)
    ));
}

/// A player outside every mapped area still yields a snapshot, flagged.
#[tokio::test]
async fn unmapped_area_is_an_anomaly() {
    let game = SyntheticGame::new(Offsets::default());
    game.add_player(&PlayerSpec {
        area: Area::HARROGATH,
        ..PlayerSpec::default()
    });
    let mut reader = reader(&game, Arc::new(CountingMaps::default()));

    let snapshot = reader.poll(true).await.expect("poll");
    assert!(
        snapshot
            .anomalies
            .contains(&Anomaly::MissingAreaMap {
                area: Area::HARROGATH
            })
    );
}
