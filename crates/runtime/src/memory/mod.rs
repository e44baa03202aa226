//! Game memory access and snapshot decoding.
//!
//! - [`source`] defines the byte-level boundary and typed read helpers
//! - [`dump`] and [`image`] are file-backed and in-memory sources
//! - [`reader`] turns memory into [`game_core::WorldSnapshot`]s
//! - [`map`] is the static map service the reader caches per session
pub mod cache;
pub mod dump;
pub mod image;
pub mod map;
pub mod reader;
pub mod source;
pub mod stats;
pub mod synth;

pub use cache::SessionCache;
pub use dump::DumpMemorySource;
pub use image::MemoryImage;
pub use map::{FileMapService, MapError, StaticMapService};
pub use reader::{ReaderError, StateReader, decode_hover, decode_menus};
pub use source::{MemoryError, MemoryReadExt, MemorySource};
pub use stats::{DecodedStat, decode_stat, decode_stat_entries};
pub use synth::{MonsterSpec, PlayerSpec, SyntheticGame};
