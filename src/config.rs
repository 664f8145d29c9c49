//! Application-level configuration loading, including the seed data of the gamer and game type
//! directories.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::dao::models::{GameTypeEntity, GamerEntity};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "LEVEL_UP_CONFIG_PATH";

#[derive(Debug, Clone, Default)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    gamers: Vec<GamerEntity>,
    game_types: Vec<GameTypeEntity>,
}

impl AppConfig {
    /// Build a configuration from explicit directory entries.
    pub fn new(gamers: Vec<GamerEntity>, game_types: Vec<GameTypeEntity>) -> Self {
        Self { gamers, game_types }
    }

    /// Load the application configuration from disk, falling back to the built-in game types.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        gamers = app_config.gamers.len(),
                        game_types = app_config.game_types.len(),
                        "loaded directory seeds from config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::builtin()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::builtin()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::builtin()
            }
        }
    }

    /// Built-in directories: the stock game types and no gamers.
    pub fn builtin() -> Self {
        Self {
            gamers: Vec::new(),
            game_types: default_game_types(),
        }
    }

    /// Gamers to register in the gamer directory.
    pub fn gamers(&self) -> &[GamerEntity] {
        &self.gamers
    }

    /// Game types to register in the game type directory.
    pub fn game_types(&self) -> &[GameTypeEntity] {
        &self.game_types
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    gamers: Vec<RawGamer>,
    #[serde(default = "default_raw_game_types")]
    game_types: Vec<RawGameType>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        Self {
            gamers: value.gamers.into_iter().map(Into::into).collect(),
            game_types: value.game_types.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawGamer {
    id: i64,
    uid: String,
    #[serde(default)]
    bio: String,
}

impl From<RawGamer> for GamerEntity {
    fn from(value: RawGamer) -> Self {
        Self {
            id: value.id,
            uid: value.uid,
            bio: value.bio,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawGameType {
    id: i64,
    label: String,
}

impl From<RawGameType> for GameTypeEntity {
    fn from(value: RawGameType) -> Self {
        Self {
            id: value.id,
            label: value.label,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

const DEFAULT_GAME_TYPE_LABELS: [&str; 4] =
    ["Board game", "Card game", "Tabletop RPG", "Miniatures"];

fn default_game_types() -> Vec<GameTypeEntity> {
    DEFAULT_GAME_TYPE_LABELS
        .iter()
        .zip(1..)
        .map(|(label, id)| GameTypeEntity {
            id,
            label: (*label).to_owned(),
        })
        .collect()
}

fn default_raw_game_types() -> Vec<RawGameType> {
    default_game_types()
        .into_iter()
        .map(|game_type| RawGameType {
            id: game_type.id,
            label: game_type.label,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_game_types_fall_back_to_builtin_list() {
        let raw: RawConfig =
            serde_json::from_str(r#"{"gamers": [{"id": 7, "uid": "abc"}]}"#).unwrap();
        let config = AppConfig::from(raw);

        assert_eq!(config.gamers().len(), 1);
        assert_eq!(config.gamers()[0].bio, "");
        assert_eq!(config.game_types(), AppConfig::builtin().game_types());
        assert_eq!(config.game_types()[0].id, 1);
    }
}
