//! Poison removal through the Cleansing aura.
use std::time::Duration;

use game_core::{SkillId, StatKind, WorldSnapshot};
use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

use super::set_skill;
use crate::api::StepError;
use crate::context::SessionContext;

/// Holds Cleansing until poison wears off or the time budget runs out.
#[derive(Clone, Copy, Debug)]
pub struct PoisonCleanse {
    poll_interval: Duration,
}

impl PoisonCleanse {
    pub const POLL_INTERVAL: Duration = Duration::from_millis(200);

    pub fn new() -> Self {
        Self {
            poll_interval: Self::POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    /// True while the decoded poison duration is positive.
    pub fn is_poisoned(snapshot: &WorldSnapshot) -> bool {
        snapshot.player.stat(StatKind::POISON_LENGTH) > 0
    }

    /// Switches to Cleansing and waits up to `duration` for poison to clear.
    ///
    /// A failed skill switch is logged and ends the routine with `Ok`. Reader
    /// failures while waiting are returned. Never sleeps past `duration`.
    pub async fn cleanse_poison(
        &self,
        ctx: &mut SessionContext,
        duration: Duration,
    ) -> Result<(), StepError> {
        if duration.is_zero() {
            return Ok(());
        }

        if let Err(err) = set_skill(ctx, SkillId::CLEANSING) {
            warn!(parent: ctx.span(), error = %err, "cannot switch to cleansing");
            return Ok(());
        }

        let deadline = Instant::now() + duration;
        let mut snapshot = ctx.snapshot();
        while Self::is_poisoned(&snapshot) {
            let now = Instant::now();
            if now >= deadline {
                debug!(parent: ctx.span(), "cleanse budget spent, still poisoned");
                break;
            }
            sleep(self.poll_interval.min(deadline - now)).await;
            snapshot = ctx.refresh().await?;
        }
        Ok(())
    }
}

impl Default for PoisonCleanse {
    fn default() -> Self {
        Self::new()
    }
}
