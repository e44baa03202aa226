//! Memory offset table loader.

use std::path::Path;

use game_core::Offsets;

use crate::loaders::{LoadResult, read_file};

/// Loader for offset tables from TOML files.
///
/// Fields missing from the file keep their baseline values.
pub struct OffsetsLoader;

impl OffsetsLoader {
    pub fn load(path: &Path) -> LoadResult<Offsets> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Offsets> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse offsets TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_table_overrides_baseline() {
        let offsets = OffsetsLoader::parse(
            "unit_table = 0x1000\n\n[unit]\nnext = 0x158\n\n[menus]\nstash = 0x19\n",
        )
        .unwrap();
        let baseline = Offsets::default();

        assert_eq!(offsets.unit_table, 0x1000);
        assert_eq!(offsets.unit.next, 0x158);
        assert_eq!(offsets.unit.path, baseline.unit.path);
        assert_eq!(offsets.menus.stash, 0x19);
        assert_eq!(offsets.menus.inventory, baseline.menus.inventory);
        assert_eq!(offsets.hover, baseline.hover);
    }

    #[test]
    fn empty_file_is_baseline() {
        assert_eq!(OffsetsLoader::parse("").unwrap(), Offsets::default());
    }
}
