//! Public seams of the runtime.
//!
//! The session loop talks to the outside world only through these traits:
//! [`GameReader`] for perception, [`Actions`] for movement and clearing, and
//! [`InputSink`] for raw key presses.

pub mod actions;
pub mod errors;
pub mod input;
pub mod reader;

pub use actions::{ActionError, Actions};
pub use errors::{
    BotError, CatalogError, CharacterError, ContextError, ReaderError, RunError, StepError,
};
pub use input::{InputError, InputSink};
pub use reader::GameReader;
