use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::{env, fs};

/// Persisted user settings, stored as a JSON file. Read once at startup,
/// written back on exit and whenever a session records a new highscore.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UserData {
    /// 1 = single player, 2 = double player.
    pub mode: u8,
    pub speed: u8,
    pub length: u8,
    pub food_abundance: u8,
    pub wall_teleport: bool,
    pub highscore: u32,
}

impl Default for UserData {
    fn default() -> Self {
        UserData {
            mode: 1,
            speed: 2,
            length: 8,
            food_abundance: 2,
            wall_teleport: true,
            highscore: 0,
        }
    }
}

impl UserData {
    pub fn load() -> Self {
        Self::load_from(&default_path())
    }

    /// Missing or corrupt data is never surfaced: the defaults are restored
    /// and re-persisted, and loaded values are clamped into their documented
    /// ranges so the engine never sees an invalid configuration.
    pub fn load_from(path: &Path) -> Self {
        let parsed = fs::read_to_string(path)
            .ok()
            .and_then(|text| serde_json::from_str::<UserData>(&text).ok());

        match parsed {
            Some(data) => data.clamped(),
            None => {
                let defaults = UserData::default();
                let _ = defaults.save_to(path);
                defaults
            }
        }
    }

    pub fn save(&self) -> io::Result<()> {
        self.save_to(&default_path())
    }

    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }

    fn clamped(mut self) -> Self {
        self.mode = self.mode.clamp(1, 2);
        self.speed = self.speed.clamp(1, 4);
        self.length = self.length.clamp(4, 12);
        self.food_abundance = self.food_abundance.clamp(1, 10);
        self
    }
}

pub fn default_path() -> PathBuf {
    match env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".color-snake.json"),
        None => PathBuf::from("color-snake.json"),
    }
}
