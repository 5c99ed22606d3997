use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::key_config::KeyConfig;
use crate::playfield_config::PlayfieldConfig;

pub const FALL_TIME_MIN: i64 = 100;
pub const FALL_TIME_MAX: i64 = 10000;
pub const OFFSET_MIN: i64 = -1000;
pub const OFFSET_MAX: i64 = 1000;
pub const LEAD_IN_MAX: i64 = 10000;

/// System-wide settings, read once at startup and passed down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct Config {
    /// Root folder scanned for `.osu` files
    pub songpath: String,
    /// Frame rate target; 0 disables pacing
    pub max_frame_per_second: i32,
    /// Time (ms) a note takes from the top edge to the hit line
    pub fall_time: i64,
    /// User audio offset (ms), added to the start correction
    pub offset: i64,
    /// Minimum silence (ms) before the first object
    pub lead_in: i64,
    pub playfield: PlayfieldConfig,
    pub keys: KeyConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            songpath: "Beatmaps".to_string(),
            max_frame_per_second: 60,
            fall_time: 1000,
            offset: 0,
            lead_in: 2000,
            playfield: PlayfieldConfig::default(),
            keys: KeyConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&mut self) {
        self.max_frame_per_second = self.max_frame_per_second.clamp(0, 1000);
        self.fall_time = self.fall_time.clamp(FALL_TIME_MIN, FALL_TIME_MAX);
        self.offset = self.offset.clamp(OFFSET_MIN, OFFSET_MAX);
        self.lead_in = self.lead_in.clamp(0, LEAD_IN_MAX);
        if self.songpath.is_empty() {
            self.songpath = Self::default().songpath;
        }

        self.playfield.validate();
        self.keys.validate();
    }

    /// Read config from a JSON file.
    pub fn read(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let mut config: Config = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config.validate();
        Ok(config)
    }

    /// Write config to a JSON file.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Read `path`, falling back to defaults when it is missing or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::read(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{e:#}; using defaults");
                Self::default()
            }
        }
    }

    pub fn songpath(&self) -> PathBuf {
        PathBuf::from(&self.songpath)
    }
}
