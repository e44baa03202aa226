use std::time::Duration;

use async_trait::async_trait;
use game_core::{KeyBindings, NpcId, SkillId};
use tokio::time::sleep;
use tracing::{info, warn};

use super::{AttackPlan, Character, TargetSelector, WaveContingency, attack_sequence, kill_boss};
use crate::api::CharacterError;
use crate::context::SessionContext;
use crate::steps::{PoisonCleanse, set_skill};

/// Paladin holding Concentration and casting Blessed Hammer.
#[derive(Clone, Debug)]
pub struct Hammerdin {
    bindings: KeyBindings,
    leveling: bool,
}

impl Hammerdin {
    /// Time spent cleansing after the second throne wave.
    pub const CLEANSE_DURATION: Duration = Duration::from_secs(6);
    /// Time spent under Salvation after the third throne wave.
    pub const SALVATION_HOLD: Duration = Duration::from_secs(5);

    const ATTACK_PLAN: AttackPlan = AttackPlan {
        right_skill: SkillId::CONCENTRATION,
        max_attacks_per_target: 30,
        max_attacks: 300,
        attack_interval: Duration::from_millis(150),
    };

    pub fn new(bindings: KeyBindings, leveling: bool) -> Self {
        Self { bindings, leveling }
    }
}

#[async_trait]
impl Character for Hammerdin {
    fn name(&self) -> &'static str {
        "hammerdin"
    }

    fn is_leveling(&self) -> bool {
        self.leveling
    }

    fn has_skill_bound(&self, skill: SkillId) -> bool {
        self.bindings.is_bound(skill)
    }

    async fn kill_monster_sequence(
        &self,
        ctx: &mut SessionContext,
        selector: &TargetSelector,
    ) -> Result<(), CharacterError> {
        attack_sequence(ctx, selector, Self::ATTACK_PLAN).await
    }

    async fn kill_baal(&self, ctx: &mut SessionContext) -> Result<(), CharacterError> {
        kill_boss(self, ctx, NpcId::BAAL_CRAB).await
    }

    fn wave_contingency(&self) -> Option<&dyn WaveContingency> {
        Some(self)
    }
}

#[async_trait]
impl WaveContingency for Hammerdin {
    async fn after_wave(&self, ctx: &mut SessionContext, wave: u8) -> Result<(), CharacterError> {
        match wave {
            2 if self.has_skill_bound(SkillId::CLEANSING) => {
                info!(parent: ctx.span(), wave, "cleansing after wave");
                PoisonCleanse::new()
                    .cleanse_poison(ctx, Self::CLEANSE_DURATION)
                    .await?;
            }
            3 if self.has_skill_bound(SkillId::SALVATION) => {
                if let Err(err) = set_skill(ctx, SkillId::SALVATION) {
                    warn!(parent: ctx.span(), error = %err, "cannot switch to salvation");
                    return Ok(());
                }
                info!(parent: ctx.span(), wave, "holding salvation after wave");
                sleep(Self::SALVATION_HOLD).await;
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_bound_skills() {
        let bindings = KeyBindings::new().with(SkillId::CLEANSING, "F5");
        let paladin = Hammerdin::new(bindings, false);
        assert!(paladin.has_skill_bound(SkillId::CLEANSING));
        assert!(!paladin.has_skill_bound(SkillId::SALVATION));
        assert!(paladin.wave_contingency().is_some());
    }
}
