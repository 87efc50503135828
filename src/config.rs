use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::audio_system::{SessionSettings, DEFAULT_ASSET_ROOT, DEFAULT_MUSIC_GAIN};
use crate::error::ConfigError;
use crate::events::GameEvent;
use crate::frame::ScriptStep;

/// One-shot effect registered for an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectEntry {
    pub event: GameEvent,
    /// File name relative to the asset root
    pub file: String,
}

impl EffectEntry {
    pub fn new(event: GameEvent, file: &str) -> Self {
        Self {
            event,
            file: file.to_string(),
        }
    }
}

fn default_effects() -> Vec<EffectEntry> {
    vec![
        EffectEntry::new(GameEvent::EatFood, "eat.mp3"),
        EffectEntry::new(GameEvent::GameOver, "gameover.mp3"),
    ]
}

fn default_demo_script() -> Vec<ScriptStep> {
    vec![
        ScriptStep::new(500, GameEvent::GameStarted),
        ScriptStep::new(2_000, GameEvent::EatFood),
        ScriptStep::new(4_000, GameEvent::GamePaused),
        ScriptStep::new(5_500, GameEvent::GameResumed),
        ScriptStep::new(7_000, GameEvent::EatFood),
        ScriptStep::new(9_000, GameEvent::GameOver),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory or http(s) URL holding the audio assets
    pub asset_root: String,

    /// Background music gain (0.0-1.0)
    pub music_volume: f32,

    /// Loop the background track when the game starts it
    pub music_loop: bool,

    pub effects: Vec<EffectEntry>,

    /// Show the FPS / delta line in the overlay
    pub show_performance_info: bool,

    pub screen_width: u32,
    pub screen_height: u32,

    /// Timeline replayed by the scripted engine
    pub demo_script: Vec<ScriptStep>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            asset_root: DEFAULT_ASSET_ROOT.to_string(),
            music_volume: DEFAULT_MUSIC_GAIN,
            music_loop: true,
            effects: default_effects(),
            show_performance_info: false,
            screen_width: 800,
            screen_height: 600,
            demo_script: default_demo_script(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the platform config directory.
    /// Writes the default config if the file doesn't exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::config_path()?,
        };

        if config_path.exists() {
            let content =
                fs::read_to_string(&config_path).map_err(|e| ConfigError::LoadFailed {
                    path: config_path.display().to_string(),
                    source: Box::new(e),
                })?;
            let config: Config =
                serde_json::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: config_path.display().to_string(),
                    source: Box::new(e),
                })?;
            config.validate()?;

            tracing::info!("Loaded config from: {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(&config_path)?;
            tracing::info!("Created default config at: {}", config_path.display());
            Ok(config)
        }
    }

    /// Save configuration to the platform config directory
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::DirectoryCreationFailed {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;
        fs::write(path, json).map_err(|e| ConfigError::SaveFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;

        Ok(())
    }

    /// `<config_dir>/SnakeAudio/config.json`
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("SnakeAudio").join("config.json"))
            .ok_or_else(|| ConfigError::Invalid("no platform config directory".to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.music_volume) {
            return Err(ConfigError::Invalid(format!(
                "music_volume {} out of range 0.0-1.0",
                self.music_volume
            )));
        }

        if self.screen_width == 0 || self.screen_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "screen size {}x{} must be non-zero",
                self.screen_width, self.screen_height
            )));
        }

        let mut seen = HashSet::new();
        for entry in &self.effects {
            if !seen.insert(entry.event) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate effect for event {}",
                    entry.event
                )));
            }
        }

        Ok(())
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings::new(&self.asset_root)
            .with_music_gain(self.music_volume)
            .with_music_loop(self.music_loop)
    }
}
