//! Baal: Worldstone Keep, the throne waves, and optionally Baal himself.
//!
//! ```text
//! Travel -> PreClear -> Throne -> Anchor -> GuardCheck -> [Portal] -> AreaClear
//!        -> WaveLoop -> [PostEncounterKill] -> Done
//! ```
//!
//! Any phase may fail the run; nothing is retried here.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use game_core::{
    Area, BaalConfig, MonsterFilter, MonsterType, NpcId, ObjectId, Position, UnitId,
    WorldSnapshot,
};
use tokio::time::{Instant, sleep};
use tracing::{Instrument, debug, info, warn};

use super::Run;
use crate::api::RunError;
use crate::context::SessionContext;
use crate::steps::{InteractPolicy, interact_object};

/// Signature spawn of each throne wave, in wave order. The last entry marks
/// the final wave.
pub const WAVE_SIGNATURES: [(NpcId, MonsterType); 5] = [
    (NpcId::WARPED_SHAMAN, MonsterType::SuperUnique),
    (NpcId::BAAL_SUBJECT_MUMMY, MonsterType::SuperUnique),
    (NpcId::COUNCIL_MEMBER_BALL, MonsterType::SuperUnique),
    (NpcId::VENOM_LORD_2, MonsterType::SuperUnique),
    (NpcId::BAALS_MINION, MonsterType::Minion),
];

const FINAL_WAVE: usize = WAVE_SIGNATURES.len() - 1;

const DOLLS: [NpcId; 2] = [NpcId::UNDEAD_STYGIAN_DOLL_2, NpcId::UNDEAD_SOUL_KILLER_2];
const SOULS: [NpcId; 2] = [NpcId::BLACK_SOUL_2, NpcId::BURNING_SOUL_2];

pub struct Baal {
    clear_filter: Option<MonsterFilter>,
}

impl Baal {
    /// Where the waves are fought.
    pub const THRONE_ANCHOR: Position = Position::new(15094, 5029);
    /// Safe spot for the leader's portal.
    pub const PORTAL_SPOT: Position = Position::new(15116, 5071);
    pub const CHAMBER_ENTRY: Position = Position::new(15136, 5943);

    pub const AREA_CLEAR_RADIUS: u32 = 29;
    pub const WAVE_RADIUS: f64 = 45.0;
    pub const WAVE_DELAY: Duration = Duration::from_millis(500);
    pub const KILL_SETTLE_DELAY: Duration = Duration::from_secs(15);

    pub fn new() -> Self {
        Self { clear_filter: None }
    }

    /// Forces floor clearing with `filter`, regardless of configuration.
    pub fn with_clear_filter(filter: MonsterFilter) -> Self {
        Self {
            clear_filter: Some(filter),
        }
    }

    /// Filter used on Worldstone Keep floors, or `None` to skip clearing.
    fn floor_filter(&self, config: &BaalConfig) -> Option<MonsterFilter> {
        if let Some(filter) = &self.clear_filter {
            return Some(filter.clone());
        }
        if !config.clear_floors {
            return None;
        }
        Some(if config.only_elites {
            MonsterFilter::Elite
        } else {
            MonsterFilter::Any
        })
    }

    async fn pre_clear(&self, ctx: &mut SessionContext, config: &BaalConfig) {
        let Some(filter) = self.floor_filter(config) else {
            return;
        };
        debug!(parent: ctx.span(), ?filter, "clearing floor");
        if let Err(err) = ctx.actions.clear_current_level(false, &filter).await {
            warn!(parent: ctx.span(), error = %err, "floor clear failed, continuing");
        }
    }

    async fn check_guards(
        &self,
        ctx: &mut SessionContext,
        config: &BaalConfig,
    ) -> Result<(), RunError> {
        let snapshot = ctx.refresh().await?;
        match guard_hit(&snapshot, config) {
            Some(found) => Err(RunError::GuardTriggered { found }),
            None => Ok(()),
        }
    }

    async fn open_portal(&self, ctx: &mut SessionContext) {
        let actions = Arc::clone(&ctx.actions);
        if let Err(err) = actions.move_to(Self::PORTAL_SPOT).await {
            warn!(parent: ctx.span(), error = %err, "cannot reach portal spot");
        }
        if let Err(err) = actions.open_portal().await {
            warn!(parent: ctx.span(), error = %err, "cannot open portal");
        }
        if let Err(err) = actions.move_to(Self::THRONE_ANCHOR).await {
            warn!(parent: ctx.span(), error = %err, "cannot return from portal spot");
        }
    }

    async fn buff(&self, ctx: &mut SessionContext) {
        if let Err(err) = ctx.actions.buff().await {
            warn!(parent: ctx.span(), error = %err, "buff failed");
        }
    }

    async fn wave_loop(&self, ctx: &mut SessionContext) -> Result<(), RunError> {
        let idle_timeout = ctx.config.timing.wave_idle_timeout();
        let mut state = WaveState::new(Instant::now());

        loop {
            let snapshot = ctx.refresh().await?;
            let previous = state.wave_number;
            state.observe(&snapshot, Instant::now());
            if state.wave_number != previous {
                info!(parent: ctx.span(), wave = state.wave_number, "wave detected");
            }
            if state.last_activity.elapsed() >= idle_timeout {
                return Err(RunError::WaveTimeout(idle_timeout));
            }

            let character = Arc::clone(&ctx.character);
            character.kill_monster_sequence(ctx, &wave_target).await?;
            ctx.actions.move_to(Self::THRONE_ANCHOR).await?;

            let snapshot = ctx.refresh().await?;
            let cleared = snapshot.enemies(&MonsterFilter::Any).is_empty();
            if let Some(wave) = state.take_cleared(cleared) {
                if let Some(contingency) = character.wave_contingency() {
                    if let Err(err) = contingency.after_wave(ctx, wave).await {
                        warn!(parent: ctx.span(), wave, error = %err, "wave contingency failed");
                    }
                }
            }

            if state.last_wave {
                info!(parent: ctx.span(), "final wave cleared");
                return Ok(());
            }
            sleep(Self::WAVE_DELAY).await;
        }
    }

    async fn kill_baal(&self, ctx: &mut SessionContext) -> Result<(), RunError> {
        sleep(Self::KILL_SETTLE_DELAY).await;
        self.buff(ctx).await;

        interact_object(
            ctx,
            ObjectId::BAALS_PORTAL,
            |snapshot| snapshot.area() == Area::THE_WORLDSTONE_CHAMBER,
            InteractPolicy::default(),
        )
        .await?;

        if let Err(err) = ctx.actions.move_to(Self::CHAMBER_ENTRY).await {
            warn!(parent: ctx.span(), error = %err, "cannot reach chamber entry");
        }

        let character = Arc::clone(&ctx.character);
        character.kill_baal(ctx).await?;
        Ok(())
    }

    async fn execute(&self, ctx: &mut SessionContext) -> Result<(), RunError> {
        let config = ctx.config.game.baal;
        let leader = ctx.config.companion.leader;
        let actions = Arc::clone(&ctx.actions);

        actions.waypoint_to(Area::THE_WORLDSTONE_KEEP_LEVEL_2).await?;
        self.pre_clear(ctx, &config).await;

        actions.move_to_area(Area::THE_WORLDSTONE_KEEP_LEVEL_3).await?;
        self.pre_clear(ctx, &config).await;

        actions.move_to_area(Area::THRONE_OF_DESTRUCTION).await?;
        actions.move_to(Self::THRONE_ANCHOR).await?;
        info!(parent: ctx.span(), "at throne");

        self.check_guards(ctx, &config).await?;

        if leader {
            self.open_portal(ctx).await;
        }

        actions
            .clear_area_around_player(Self::AREA_CLEAR_RADIUS, &MonsterFilter::Any)
            .await?;
        actions.move_to(Self::THRONE_ANCHOR).await?;
        self.buff(ctx).await;

        self.wave_loop(ctx).await?;

        if config.kill_baal || ctx.character.is_leveling() {
            self.kill_baal(ctx).await?;
        }
        Ok(())
    }
}

impl Default for Baal {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Run for Baal {
    fn name(&self) -> &str {
        "baal"
    }

    async fn run(&self, ctx: &mut SessionContext) -> Result<(), RunError> {
        let span = tracing::info_span!(parent: ctx.span(), "baal");
        self.execute(ctx).instrument(span).await
    }
}

/// First abort identity present, honoring each family's toggle.
fn guard_hit(snapshot: &WorldSnapshot, config: &BaalConfig) -> Option<NpcId> {
    snapshot.monsters.iter().map(|m| m.name).find(|name| {
        (config.doll_quit && DOLLS.contains(name)) || (config.soul_quit && SOULS.contains(name))
    })
}

/// Nearest enemy to the throne anchor that is in range and on walkable ground.
fn wave_target(snapshot: &WorldSnapshot) -> Option<UnitId> {
    let anchor = Baal::THRONE_ANCHOR;
    snapshot
        .enemies(&MonsterFilter::Any)
        .into_iter()
        .filter(|m| m.position.distance(anchor) <= Baal::WAVE_RADIUS)
        .filter(|m| snapshot.is_walkable(m.position))
        .min_by(|a, b| {
            a.position
                .distance(anchor)
                .total_cmp(&b.position.distance(anchor))
        })
        .map(|m| m.unit_id)
}

/// Wave bookkeeping for one run of the throne loop.
#[derive(Debug)]
struct WaveState {
    /// Last observed wave, 0 before the first.
    wave_number: u8,
    last_handled_wave: u8,
    last_wave: bool,
    last_activity: Instant,
}

impl WaveState {
    fn new(now: Instant) -> Self {
        Self {
            wave_number: 0,
            last_handled_wave: 0,
            last_wave: false,
            last_activity: now,
        }
    }

    fn observe(&mut self, snapshot: &WorldSnapshot, now: Instant) {
        let mut matched = false;
        for (index, (npc, kind)) in WAVE_SIGNATURES.iter().enumerate() {
            if snapshot.monsters.find_one(*npc, *kind).is_none() {
                continue;
            }
            matched = true;
            if index == FINAL_WAVE {
                self.last_wave = true;
                continue;
            }
            self.wave_number = index as u8 + 1;
            break;
        }
        if matched || !snapshot.monsters.is_empty() {
            self.last_activity = now;
        }
    }

    /// Returns the wave whose post-wave hook is due, at most once per wave.
    fn take_cleared(&mut self, no_enemies: bool) -> Option<u8> {
        if !no_enemies || self.wave_number == 0 || self.wave_number == self.last_handled_wave {
            return None;
        }
        self.last_handled_wave = self.wave_number;
        Some(self.wave_number)
    }
}
