//! Bot configuration loader.

use std::path::Path;

use game_core::BotConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for bot configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate a [`BotConfig`] from a TOML file.
    pub fn load(path: &Path) -> LoadResult<BotConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))
    }

    /// Parse and validate a [`BotConfig`] from TOML text.
    pub fn parse(content: &str) -> LoadResult<BotConfig> {
        let config: BotConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{CharacterClass, Difficulty, SkillId};

    const SAMPLE: &str = r#"
[character]
name = "hammer"
class = "hammerdin"

[game]
difficulty = "nightmare"
runs = ["baal"]

[game.baal]
clear_floors = true
only_elites = true
soul_quit = true

[companion]
leader = true

[health]
min_mana_percent = 10

[bindings]
cleansing = "F5"
salvation = "F6"
112 = "F1"
"#;

    #[test]
    fn parses_sections_and_bindings() {
        let config = ConfigLoader::parse(SAMPLE).unwrap();
        assert_eq!(config.character.class, CharacterClass::Hammerdin);
        assert_eq!(config.game.difficulty, Difficulty::Nightmare);
        assert!(config.game.baal.clear_floors);
        assert!(config.game.baal.soul_quit);
        assert!(!config.game.baal.doll_quit);
        // Unset toggles keep their defaults.
        assert!(config.game.baal.kill_baal);
        assert!(config.companion.leader);
        assert_eq!(config.health.min_mana_percent, 10);
        assert_eq!(config.health.min_life_percent, 30);
        assert_eq!(
            config.bindings.for_skill(SkillId::CLEANSING).map(|b| b.as_str()),
            Some("F5")
        );
        assert!(config.bindings.is_bound(SkillId::BLESSED_HAMMER));
    }

    #[test]
    fn rejects_unknown_skill_names() {
        let text = "[character]\nname = \"x\"\n[bindings]\nnot_a_skill = \"F1\"\n";
        assert!(ConfigLoader::parse(text).is_err());
    }

    #[test]
    fn rejects_invalid_config() {
        let err = ConfigLoader::parse("[game]\nruns = []\n").unwrap_err();
        assert!(err.to_string().contains("character name"));
    }

    #[test]
    fn load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let err = ConfigLoader::load(&path).unwrap_err();
        assert!(err.to_string().contains("missing.toml"));
    }
}
