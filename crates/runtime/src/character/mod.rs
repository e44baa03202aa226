//! Class-specific combat behavior.
//!
//! Runs decide where to fight; a [`Character`] decides how. Characters are
//! stateless apart from their configuration and receive the session context
//! on every call.

mod hammerdin;
mod sorceress;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use game_core::{BotConfig, CharacterClass, NpcId, SkillId, UnitId, WorldSnapshot};
use tokio::time::sleep;
use tracing::{debug, warn};

pub use hammerdin::Hammerdin;
pub use sorceress::BlizzardSorceress;

use crate::api::CharacterError;
use crate::context::SessionContext;
use crate::steps::set_skill_with;

/// Picks the next target from a snapshot, or `None` when nothing is left.
pub type TargetSelector = dyn Fn(&WorldSnapshot) -> Option<UnitId> + Send + Sync;

#[async_trait]
pub trait Character: Send + Sync {
    fn name(&self) -> &'static str;

    /// Leveling characters always kill the final boss of a run.
    fn is_leveling(&self) -> bool {
        false
    }

    fn has_skill_bound(&self, skill: SkillId) -> bool;

    /// Attacks whatever `selector` returns until it returns `None`.
    async fn kill_monster_sequence(
        &self,
        ctx: &mut SessionContext,
        selector: &TargetSelector,
    ) -> Result<(), CharacterError>;

    async fn kill_baal(&self, ctx: &mut SessionContext) -> Result<(), CharacterError>;

    /// Post-wave behavior for the Baal throne, if the class has any.
    fn wave_contingency(&self) -> Option<&dyn WaveContingency> {
        None
    }
}

/// Hook invoked once per cleared Baal wave.
#[async_trait]
pub trait WaveContingency: Send + Sync {
    async fn after_wave(&self, ctx: &mut SessionContext, wave: u8) -> Result<(), CharacterError>;
}

/// Builds the character configured for a session.
pub fn build_character(config: &BotConfig) -> Arc<dyn Character> {
    let bindings = config.bindings.clone();
    let leveling = config.character.leveling;
    match config.character.class {
        CharacterClass::Hammerdin => Arc::new(Hammerdin::new(bindings, leveling)),
        CharacterClass::BlizzardSorceress => Arc::new(BlizzardSorceress::new(bindings, leveling)),
    }
}

/// How a class attacks one target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackPlan {
    /// Right-hand skill held while attacking (aura or spell).
    pub right_skill: SkillId,
    /// Attacks against a single target before giving up on it.
    pub max_attacks_per_target: u32,
    /// Attacks in one sequence before returning.
    pub max_attacks: u32,
    pub attack_interval: Duration,
}

/// Selects, attacks and re-selects targets until the selector is exhausted.
///
/// A target that survives `max_attacks_per_target` attacks ends the sequence
/// with a warning, as does reaching `max_attacks`.
pub async fn attack_sequence(
    ctx: &mut SessionContext,
    selector: &TargetSelector,
    plan: AttackPlan,
) -> Result<(), CharacterError> {
    let mut attacks_on: HashMap<UnitId, u32> = HashMap::new();
    let mut total = 0u32;

    loop {
        let snapshot = ctx.refresh().await?;
        let Some(target_id) = selector(&snapshot) else {
            return Ok(());
        };
        let Some(target) = snapshot.monsters.find_by_id(target_id) else {
            debug!(parent: ctx.span(), target = %target_id, "selected target vanished");
            return Ok(());
        };

        let attacks = attacks_on.entry(target_id).or_default();
        if *attacks >= plan.max_attacks_per_target {
            warn!(
                parent: ctx.span(),
                target = %target_id,
                monster = %target.name,
                attacks = *attacks,
                "target survived every attack, moving on"
            );
            return Ok(());
        }
        if total >= plan.max_attacks {
            warn!(parent: ctx.span(), total, "attack budget exhausted");
            return Ok(());
        }

        set_skill_with(ctx, plan.right_skill, true)?;
        ctx.input.attack_at(target.position)?;
        *attacks += 1;
        total += 1;

        sleep(plan.attack_interval).await;
    }
}

/// Selector for the first live monster of class `npc`, any rank.
pub(crate) fn first_of(npc: NpcId) -> impl Fn(&WorldSnapshot) -> Option<UnitId> + Send + Sync {
    move |snapshot| {
        snapshot
            .monsters
            .iter()
            .find(|m| m.name == npc)
            .map(|m| m.unit_id)
    }
}

/// Refreshes, checks `boss` is visible, then attacks it until it dies.
pub(crate) async fn kill_boss<C: Character + ?Sized>(
    character: &C,
    ctx: &mut SessionContext,
    boss: NpcId,
) -> Result<(), CharacterError> {
    let snapshot = ctx.refresh().await?;
    if !snapshot.monsters.iter().any(|m| m.name == boss) {
        return Err(CharacterError::BossNotFound { boss });
    }
    character.kill_monster_sequence(ctx, &first_of(boss)).await
}
