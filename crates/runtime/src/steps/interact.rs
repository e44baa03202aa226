//! Object interaction with a caller-supplied arrival check.
use std::time::Duration;

use game_core::{ObjectId, WorldSnapshot};
use tokio::time::sleep;
use tracing::{debug, info};

use crate::api::StepError;
use crate::context::SessionContext;

/// Retry policy of [`interact_object`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InteractPolicy {
    pub attempts: u32,
    /// Wait after each click before checking arrival.
    pub settle: Duration,
}

impl Default for InteractPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            settle: Duration::from_millis(500),
        }
    }
}

/// Clicks `object` until `arrived` holds for a fresh snapshot.
///
/// Used for objects whose destination cannot be read from memory, so success
/// is whatever the caller says it is.
pub async fn interact_object<F>(
    ctx: &mut SessionContext,
    object: ObjectId,
    arrived: F,
    policy: InteractPolicy,
) -> Result<(), StepError>
where
    F: Fn(&WorldSnapshot) -> bool + Send + Sync,
{
    for attempt in 1..=policy.attempts {
        let snapshot = ctx.refresh().await?;
        if arrived(&snapshot) {
            info!(parent: ctx.span(), %object, attempt, "interaction complete");
            return Ok(());
        }

        let Some(target) = snapshot.objects.find_one(object).copied() else {
            return Err(StepError::ObjectNotFound { object });
        };
        debug!(parent: ctx.span(), %object, attempt, "interacting");
        ctx.actions.interact(&target).await?;
        sleep(policy.settle).await;
    }

    let snapshot = ctx.refresh().await?;
    if arrived(&snapshot) {
        return Ok(());
    }
    Err(StepError::InteractionFailed {
        object,
        attempts: policy.attempts,
    })
}
