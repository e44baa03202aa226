//! Movement, clearing and interaction façade used by runs.
//!
//! Path-finding and travel live outside this crate; runs only see this trait.
//! Any retry policy belongs to the implementation.
use async_trait::async_trait;
use game_core::{Area, MonsterFilter, Object, Position};
use thiserror::Error;

/// Failure reported by the action façade.
#[derive(Debug, Error)]
#[error("{action} failed: {reason}")]
pub struct ActionError {
    pub action: &'static str,
    pub reason: String,
}

impl ActionError {
    pub fn new(action: &'static str, reason: impl Into<String>) -> Self {
        Self {
            action,
            reason: reason.into(),
        }
    }
}

#[async_trait]
pub trait Actions: Send + Sync {
    /// Travels to `area` through the waypoint network.
    async fn waypoint_to(&self, area: Area) -> Result<(), ActionError>;

    /// Walks into an adjacent area.
    async fn move_to_area(&self, area: Area) -> Result<(), ActionError>;

    /// Moves to an absolute position in the current area.
    async fn move_to(&self, position: Position) -> Result<(), ActionError>;

    /// Clears every monster matching `filter` in the current area.
    async fn clear_current_level(
        &self,
        open_chests: bool,
        filter: &MonsterFilter,
    ) -> Result<(), ActionError>;

    /// Clears monsters matching `filter` within `radius` of the player.
    async fn clear_area_around_player(
        &self,
        radius: u32,
        filter: &MonsterFilter,
    ) -> Result<(), ActionError>;

    /// Opens a town portal for party members.
    async fn open_portal(&self) -> Result<(), ActionError>;

    /// Casts the configured buff skills.
    async fn buff(&self) -> Result<(), ActionError>;

    /// Clicks an object once.
    async fn interact(&self, object: &Object) -> Result<(), ActionError>;
}
