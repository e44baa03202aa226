//! Data-driven bot content and loaders.
//!
//! This crate reads the files a deployment maintains next to the bot:
//! - Bot configuration (TOML)
//! - Memory offset tables (TOML)
//! - Static map data per session seed and difficulty (RON)
//!
//! All loaders deserialize straight into game-core types.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, LoadResult, MapLoader, OffsetsLoader};
