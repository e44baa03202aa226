//! Process-level configuration read from the environment.
use std::env;
use std::path::PathBuf;

/// Settings of one `bot` process. Per-session behavior lives in each
/// session's TOML file under the data directory.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Log directory name; generated from the start time when unset.
    pub session_id: Option<String>,
    /// Root of `config.toml`, `offsets.toml`, `sessions/` and `maps/`.
    pub data_dir: PathBuf,
    /// Session names run side by side.
    pub sessions: Vec<String>,
    /// Memory dump to read instead of the built-in demo world.
    pub dump_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            session_id: None,
            data_dir: default_data_dir(),
            sessions: vec![Self::DEFAULT_SESSION.to_owned()],
            dump_path: None,
        }
    }
}

impl ClientConfig {
    pub const DEFAULT_SESSION: &'static str = "main";

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BOT_SESSION_ID` - Log directory name (default: auto-generated)
    /// - `BOT_DATA_DIR` - Content directory (default: platform data dir)
    /// - `BOT_SESSIONS` - Comma-separated session names (default: `main`)
    /// - `BOT_DUMP_PATH` - Memory dump file (default: demo world)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.session_id = env::var("BOT_SESSION_ID").ok();

        if let Some(dir) = read_env::<PathBuf>("BOT_DATA_DIR") {
            config.data_dir = dir;
        }

        if let Ok(raw) = env::var("BOT_SESSIONS") {
            let sessions = parse_sessions(&raw);
            if !sessions.is_empty() {
                config.sessions = sessions;
            }
        }

        config.dump_path = read_env::<PathBuf>("BOT_DUMP_PATH");

        config
    }

    /// Configuration file of `session`: `sessions/<name>.toml` when present,
    /// the shared `config.toml` otherwise.
    pub fn session_config_path(&self, session: &str) -> PathBuf {
        let dedicated = self.data_dir.join("sessions").join(format!("{session}.toml"));
        if dedicated.exists() {
            dedicated
        } else {
            self.data_dir.join("config.toml")
        }
    }
}

fn parse_sessions(raw: &str) -> Vec<String> {
    let mut sessions: Vec<String> = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !sessions.iter().any(|s| s == name) {
            sessions.push(name.to_owned());
        }
    }
    sessions
}

fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "gamebot")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("data"))
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_list_is_trimmed_and_deduplicated() {
        assert_eq!(parse_sessions(" a, b ,,a"), vec!["a", "b"]);
        assert!(parse_sessions(" , ").is_empty());
    }

    #[test]
    fn dedicated_session_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sessions")).unwrap();
        std::fs::write(dir.path().join("sessions/alt.toml"), "").unwrap();
        let config = ClientConfig {
            data_dir: dir.path().to_path_buf(),
            ..ClientConfig::default()
        };

        assert_eq!(
            config.session_config_path("alt"),
            dir.path().join("sessions/alt.toml")
        );
        assert_eq!(
            config.session_config_path("main"),
            dir.path().join("config.toml")
        );
    }
}
