use std::time::Duration;

use async_trait::async_trait;
use game_core::{KeyBindings, NpcId, SkillId};

use super::{AttackPlan, Character, TargetSelector, attack_sequence, kill_boss};
use crate::api::CharacterError;
use crate::context::SessionContext;

/// Sorceress casting Blizzard with the right hand.
#[derive(Clone, Debug)]
pub struct BlizzardSorceress {
    bindings: KeyBindings,
    leveling: bool,
}

impl BlizzardSorceress {
    const ATTACK_PLAN: AttackPlan = AttackPlan {
        right_skill: SkillId::BLIZZARD,
        max_attacks_per_target: 12,
        max_attacks: 120,
        attack_interval: Duration::from_millis(400),
    };

    pub fn new(bindings: KeyBindings, leveling: bool) -> Self {
        Self { bindings, leveling }
    }
}

#[async_trait]
impl Character for BlizzardSorceress {
    fn name(&self) -> &'static str {
        "blizzard_sorceress"
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
}
