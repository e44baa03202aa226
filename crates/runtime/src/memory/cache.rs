use std::sync::Arc;

use game_core::MapData;

/// Session-invariant state kept by the reader between polls.
///
/// Built in full when a new session is signalled and reused verbatim
/// otherwise. Never shared outside the reader.
#[derive(Clone, Debug)]
pub struct SessionCache {
    /// Address of the local player unit record.
    pub player_unit: u64,
    pub map_seed: u32,
    pub map: Arc<MapData>,
}
