//! Right-hand skill selection.
use game_core::SkillId;
use tracing::debug;

use crate::api::StepError;
use crate::context::SessionContext;

/// Makes `skill` the active right-hand skill.
///
/// Presses the bound key once when the current right-hand skill differs, and
/// does nothing otherwise. Fails when the skill has no binding.
pub fn set_skill(ctx: &SessionContext, skill: SkillId) -> Result<(), StepError> {
    set_skill_with(ctx, skill, false)
}

/// Like [`set_skill`], but an unbound skill is a silent no-op when
/// `allow_missing` is set.
pub fn set_skill_with(
    ctx: &SessionContext,
    skill: SkillId,
    allow_missing: bool,
) -> Result<(), StepError> {
    let Some(binding) = ctx.config.bindings.for_skill(skill) else {
        if allow_missing {
            debug!(parent: ctx.span(), %skill, "no binding, skipping skill switch");
            return Ok(());
        }
        return Err(StepError::MissingBinding { skill });
    };

    if ctx.snapshot().player.right_skill == skill {
        return Ok(());
    }

    debug!(parent: ctx.span(), %skill, key = %binding, "switching right skill");
    ctx.input.press_binding(binding)?;
    Ok(())
}
