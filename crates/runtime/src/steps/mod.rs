//! Reusable building blocks shared by characters and runs.

mod interact;
mod poison;
mod set_skill;

pub use interact::{InteractPolicy, interact_object};
pub use poison::PoisonCleanse;
pub use set_skill::{set_skill, set_skill_with};
