//! Keyboard and mouse injection boundary.
//!
//! Input is fire-and-forget: success is inferred from the next snapshot, never
//! acknowledged by the sink.
use game_core::{KeyBinding, Position};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("input backend unavailable: {0}")]
    Unavailable(String),
}

/// Sends input to the game window.
pub trait InputSink: Send + Sync {
    fn press_binding(&self, binding: &KeyBinding) -> Result<(), InputError>;

    /// Casts the left-hand skill at an absolute world position.
    fn attack_at(&self, target: Position) -> Result<(), InputError>;
}
