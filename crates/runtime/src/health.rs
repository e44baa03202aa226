//! Life and mana floors watched while a run is active.
//!
//! The session context publishes every snapshot it installs; [`HealthMonitor`]
//! follows that stream and reports the first snapshot whose life or mana is
//! below the configured percentage.
use std::fmt;
use std::sync::Arc;

use game_core::{HealthConfig, PlayerUnit, StatKind, WorldSnapshot};
use tokio::sync::watch;
use tracing::warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Resource {
    Life,
    Mana,
}

impl Resource {
    fn stats(self) -> (StatKind, StatKind) {
        match self {
            Resource::Life => (StatKind::LIFE, StatKind::MAX_LIFE),
            Resource::Mana => (StatKind::MANA, StatKind::MAX_MANA),
        }
    }

    /// Current share of the maximum, `None` when the maximum is unknown.
    pub fn percent(self, player: &PlayerUnit) -> Option<u8> {
        let (current, max) = self.stats();
        let max = player.stat(max);
        if max <= 0 {
            return None;
        }
        let percent = player.stat(current).clamp(0, max) * 100 / max;
        u8::try_from(percent).ok()
    }
}

/// A resource observed below its floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HealthBreach {
    pub resource: Resource,
    pub percent: u8,
    pub threshold: u8,
}

impl fmt::Display for HealthBreach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}%, below {}%",
            self.resource, self.percent, self.threshold
        )
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct HealthMonitor {
    config: HealthConfig,
}

impl HealthMonitor {
    pub fn new(config: HealthConfig) -> Self {
        Self { config }
    }

    pub fn check(&self, snapshot: &WorldSnapshot) -> Option<HealthBreach> {
        [
            (Resource::Life, self.config.min_life_percent),
            (Resource::Mana, self.config.min_mana_percent),
        ]
        .into_iter()
        .find_map(|(resource, threshold)| {
            let percent = resource.percent(&snapshot.player)?;
            (percent < threshold).then_some(HealthBreach {
                resource,
                percent,
                threshold,
            })
        })
    }

    /// Resolves on the first published snapshot that breaches a floor,
    /// starting with the one already installed.
    ///
    /// Never resolves once the publishing context is gone.
    pub async fn watch(
        &self,
        snapshots: &mut watch::Receiver<Arc<WorldSnapshot>>,
    ) -> HealthBreach {
        loop {
            let snapshot = Arc::clone(&snapshots.borrow_and_update());
            if let Some(breach) = self.check(&snapshot) {
                warn!(%breach, "health floor breached");
                return breach;
            }
            if snapshots.changed().await.is_err() {
                return std::future::pending().await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(life: i64, max_life: i64, mana: i64, max_mana: i64) -> WorldSnapshot {
        let mut snapshot = WorldSnapshot::default();
        let stats = &mut snapshot.player.stats;
        stats.set(StatKind::LIFE, life);
        stats.set(StatKind::MAX_LIFE, max_life);
        stats.set(StatKind::MANA, mana);
        stats.set(StatKind::MAX_MANA, max_mana);
        snapshot
    }

    fn monitor(life: u8, mana: u8) -> HealthMonitor {
        HealthMonitor::new(HealthConfig {
            min_life_percent: life,
            min_mana_percent: mana,
        })
    }

    #[test]
    fn life_below_floor_is_a_breach() {
        let breach = monitor(30, 0).check(&snapshot(290, 1000, 0, 100));
        assert_eq!(
            breach,
            Some(HealthBreach {
                resource: Resource::Life,
                percent: 29,
                threshold: 30
            })
        );
        assert_eq!(monitor(30, 0).check(&snapshot(300, 1000, 0, 100)), None);
    }

    #[test]
    fn mana_floor_applies_when_enabled() {
        let low_mana = snapshot(1000, 1000, 5, 100);
        assert_eq!(monitor(30, 0).check(&low_mana), None);
        assert_eq!(
            monitor(30, 10).check(&low_mana).map(|b| b.resource),
            Some(Resource::Mana)
        );
    }

    #[test]
    fn unknown_maximum_never_breaches() {
        let mut snapshot = WorldSnapshot::default();
        snapshot.player.stats.set(StatKind::LIFE, 1);
        assert_eq!(monitor(100, 100).check(&snapshot), None);
        assert_eq!(Resource::Life.percent(&snapshot.player), None);
    }

    #[test]
    fn percent_is_clamped_to_the_maximum() {
        let overhealed = snapshot(1500, 1000, 0, 100);
        assert_eq!(Resource::Life.percent(&overhealed.player), Some(100));
        let dead = snapshot(-5, 1000, 0, 100);
        assert_eq!(Resource::Life.percent(&dead.player), Some(0));
    }

    #[tokio::test]
    async fn watch_resolves_on_first_breaching_snapshot() {
        let (tx, mut rx) = watch::channel(Arc::new(snapshot(900, 1000, 0, 100)));
        let monitor = monitor(30, 0);

        let watcher = tokio::spawn(async move { monitor.watch(&mut rx).await });
        tx.send_replace(Arc::new(snapshot(500, 1000, 0, 100)));
        tx.send_replace(Arc::new(snapshot(100, 1000, 0, 100)));

        let breach = watcher.await.expect("watcher task");
        assert_eq!(breach.percent, 10);
    }
}
