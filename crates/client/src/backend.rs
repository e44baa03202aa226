//! Dry-run seams: log what a real backend would do.
//!
//! The bot process has no path-finder or input injector of its own; these
//! stand in so sessions against a memory dump can run end to end.
use async_trait::async_trait;
use game_core::{Area, KeyBinding, MonsterFilter, Object, Position};
use runtime::{ActionError, Actions, InputError, InputSink};
use tracing::info;

#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingInput;

impl InputSink for LoggingInput {
    fn press_binding(&self, binding: &KeyBinding) -> Result<(), InputError> {
        info!(key = %binding, "press");
        Ok(())
    }

    fn attack_at(&self, target: Position) -> Result<(), InputError> {
        info!(%target, "attack");
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DryRunActions;

#[async_trait]
impl Actions for DryRunActions {
    async fn waypoint_to(&self, area: Area) -> Result<(), ActionError> {
        info!(%area, "waypoint");
        Ok(())
    }

    async fn move_to_area(&self, area: Area) -> Result<(), ActionError> {
        info!(%area, "move to area");
        Ok(())
    }

    async fn move_to(&self, position: Position) -> Result<(), ActionError> {
        info!(%position, "move");
        Ok(())
    }

    async fn clear_current_level(
        &self,
        open_chests: bool,
        filter: &MonsterFilter,
    ) -> Result<(), ActionError> {
        info!(open_chests, ?filter, "clear level");
        Ok(())
    }

    async fn clear_area_around_player(
        &self,
        radius: u32,
        filter: &MonsterFilter,
    ) -> Result<(), ActionError> {
        info!(radius, ?filter, "clear around player");
        Ok(())
    }

    async fn open_portal(&self) -> Result<(), ActionError> {
        info!("open portal");
        Ok(())
    }

    async fn buff(&self) -> Result<(), ActionError> {
        info!("buff");
        Ok(())
    }

    async fn interact(&self, object: &Object) -> Result<(), ActionError> {
        info!(object = %object.name, position = %object.position, "interact");
        Ok(())
    }
}
