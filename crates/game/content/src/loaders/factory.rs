//! Content factory for loading bot data from a data directory.

use std::path::{Path, PathBuf};

use game_core::{BotConfig, Difficulty, MapData, Offsets};

use crate::loaders::{ConfigLoader, LoadResult, MapLoader, OffsetsLoader};

/// Content factory that loads all bot content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── offsets.toml        (optional, baseline when absent)
/// └── maps/
///     ├── 1184733651-hell.ron
///     └── 98213-nightmare.ron
/// ```
#[derive(Clone, Debug)]
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load bot configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<BotConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load the offset table from `offsets.toml`, or the baseline if the file is absent.
    pub fn load_offsets(&self) -> LoadResult<Offsets> {
        let path = self.data_dir.join("offsets.toml");
        if !path.exists() {
            return Ok(Offsets::default());
        }
        OffsetsLoader::load(&path)
    }

    /// Path of the map dump for one session.
    pub fn map_path(&self, seed: &str, difficulty: Difficulty) -> PathBuf {
        self.data_dir
            .join("maps")
            .join(format!("{}-{}.ron", seed, difficulty))
    }

    /// Load the map dump for `(seed, difficulty)` from `maps/`.
    pub fn load_map(&self, seed: &str, difficulty: Difficulty) -> LoadResult<MapData> {
        MapLoader::load(&self.map_path(seed, difficulty))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
