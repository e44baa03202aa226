//! Static map data loader.
//!
//! Map dumps are produced by an external map generator, one RON file per
//! session seed and difficulty.

use std::path::Path;

use game_core::MapData;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`MapData`] from RON files.
pub struct MapLoader;

impl MapLoader {
    pub fn load(path: &Path) -> LoadResult<MapData> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid map {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<MapData> {
        ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse map RON: {}", e))
    }
}
