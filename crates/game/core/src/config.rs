//! Per-session bot configuration.
//!
//! Loaded from TOML by `game-content`. Every section has defaults so a config
//! file only needs the fields it changes.
use std::time::Duration;

use crate::error::ConfigError;
use crate::state::KeyBindings;

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Difficulty {
    Normal,
    Nightmare,
    #[default]
    Hell,
}

/// Character build driven by the bot.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CharacterClass {
    #[default]
    Hammerdin,
    BlizzardSorceress,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CharacterConfig {
    pub name: String,
    pub class: CharacterClass,
    /// Leveling characters always finish Baal runs with the boss kill.
    pub leveling: bool,
}

/// Toggles of the Baal run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct BaalConfig {
    /// Clear Worldstone Keep levels 2 and 3 on the way down.
    pub clear_floors: bool,
    /// Restrict floor clearing to elites.
    pub only_elites: bool,
    pub kill_baal: bool,
    /// Abort when Undead Stygian Dolls or Soul Killers are present.
    pub doll_quit: bool,
    /// Abort when Black or Burning Souls are present.
    pub soul_quit: bool,
}

impl Default for BaalConfig {
    fn default() -> Self {
        Self {
            clear_floors: false,
            only_elites: false,
            kill_baal: true,
            doll_quit: false,
            soul_quit: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct GameSettings {
    pub difficulty: Difficulty,
    /// Run names executed in order every session.
    pub runs: Vec<String>,
    pub baal: BaalConfig,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            runs: vec!["baal".to_owned()],
            baal: BaalConfig::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CompanionConfig {
    /// The leader opens portals for followers.
    pub leader: bool,
}

/// Life and mana floors checked on every snapshot while a run is active.
///
/// A threshold of 0 disables that check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct HealthConfig {
    pub min_life_percent: u8,
    pub min_mana_percent: u8,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            min_life_percent: 30,
            min_mana_percent: 0,
        }
    }
}

/// Polling cadence and bounded waits, in milliseconds / seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct TimingConfig {
    pub poll_interval_ms: u64,
    pub attach_timeout_secs: u64,
    /// Wave loop gives up after this long without a wave or an enemy.
    pub wave_idle_timeout_secs: u64,
}

impl TimingConfig {
    pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;
    pub const DEFAULT_ATTACH_TIMEOUT_SECS: u64 = 60;
    pub const DEFAULT_WAVE_IDLE_TIMEOUT_SECS: u64 = 120;

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn attach_timeout(&self) -> Duration {
        Duration::from_secs(self.attach_timeout_secs)
    }

    pub fn wave_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.wave_idle_timeout_secs)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: Self::DEFAULT_POLL_INTERVAL_MS,
            attach_timeout_secs: Self::DEFAULT_ATTACH_TIMEOUT_SECS,
            wave_idle_timeout_secs: Self::DEFAULT_WAVE_IDLE_TIMEOUT_SECS,
        }
    }
}

/// Complete configuration of one bot session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct BotConfig {
    pub character: CharacterConfig,
    pub game: GameSettings,
    pub companion: CompanionConfig,
    pub bindings: KeyBindings,
    pub timing: TimingConfig,
    pub health: HealthConfig,
}

impl BotConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.character.name.trim().is_empty() {
            return Err(ConfigError::EmptyCharacterName);
        }
        if self.game.runs.is_empty() {
            return Err(ConfigError::NoRuns);
        }
        if self.timing.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval {
                field: "timing.poll_interval_ms",
            });
        }
        for (field, value) in [
            ("health.min_life_percent", self.health.min_life_percent),
            ("health.min_mana_percent", self.health.min_mana_percent),
        ] {
            if value > 100 {
                return Err(ConfigError::PercentOutOfRange { field, value });
            }
        }
        Ok(())
    }
}
