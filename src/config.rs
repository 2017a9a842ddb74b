use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::layout::{Canvas, LayoutParams};

/// Tunable game constants. Every field falls back to its default when
/// missing from the config file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub item_size: f64,
    pub margin: f64,
    pub padding: f64,
    pub max_attempts: usize,
    pub tick_interval_ms: u64,
    pub auto_play_interval_ms: u64,
    pub reveal_delay_ms: u64,
    pub min_points: usize,
    pub max_points: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            canvas_width: 740.0,
            canvas_height: 540.0,
            item_size: 60.0,
            margin: 15.0,
            padding: 30.0,
            max_attempts: 100,
            tick_interval_ms: 100,
            auto_play_interval_ms: 1000,
            reveal_delay_ms: 1000,
            min_points: 1,
            max_points: 50,
        }
    }
}

impl GameSettings {
    pub fn layout(&self) -> LayoutParams {
        LayoutParams {
            canvas: Canvas {
                width: self.canvas_width,
                height: self.canvas_height,
            },
            item_size: self.item_size,
            margin: self.margin,
            padding: self.padding,
            max_attempts: self.max_attempts,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn auto_play_interval(&self) -> Duration {
        Duration::from_millis(self.auto_play_interval_ms)
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn clamp_points(&self, n: usize) -> usize {
        n.clamp(self.min_points, self.max_points.max(self.min_points))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Point count of the last game played
    pub point_count: usize,
    pub game: GameSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            point_count: 10,
            game: GameSettings::default(),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "schulte") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("schulte_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(e) => log::warn!("ignoring malformed config {}: {e}", self.path.display()),
            },
            Err(e) => log::debug!("no config at {}: {e}", self.path.display()),
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(std::io::Error::other)?;
        fs::write(&self.path, data)
    }
}
