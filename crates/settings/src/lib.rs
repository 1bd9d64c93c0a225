use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::BufReader,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::warn;

const QUALIFIER: &str = "com";
const ORGANIZATION: &str = "rubiks";
const APPLICATION: &str = "rubiks-cube";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("unable to resolve platform config directory")]
    MissingProjectDirs,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Tuning knobs for the simulator. Cube state itself is never stored here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub camera: CameraSettings,
    pub manipulation: ManipulationSettings,
    pub mixer: MixerSettings,
    pub window: WindowSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Distance from the origin along +Z at startup
    pub initial_distance: f32,
    /// Dolly per scroll line
    pub zoom_step: f32,
    /// World units per pixel of camera pan drag
    pub pan_sensitivity: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
            initial_distance: 10.0,
            zoom_step: 0.5,
            pan_sensitivity: 0.005,
            min_distance: 2.0,
            max_distance: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManipulationSettings {
    /// Degrees of orbit per pixel of drag
    pub orbit_sensitivity: f32,
    /// Translation per arrow key press
    pub arrow_pan_step: f32,
    pub rotate_button: MouseButtonSetting,
    pub translate_button: MouseButtonSetting,
}

impl Default for ManipulationSettings {
    fn default() -> Self {
        Self {
            orbit_sensitivity: 0.1,
            arrow_pan_step: 1.0,
            rotate_button: MouseButtonSetting::Left,
            translate_button: MouseButtonSetting::Right,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixerSettings {
    pub min_steps: u32,
    pub max_steps: u32,
    pub step_delay_ms: u64,
    pub log_path: PathBuf,
    /// Fixed RNG seed for reproducible runs (None = seeded from entropy)
    pub seed: Option<u64>,
}

impl Default for MixerSettings {
    fn default() -> Self {
        Self {
            min_steps: 50,
            max_steps: 99,
            step_delay_ms: 50,
            log_path: PathBuf::from("mixer.txt"),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            title: "Rubik's Cube".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MouseButtonSetting {
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new() -> Result<Self, SettingsError> {
        let dirs = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .ok_or(SettingsError::MissingProjectDirs)?;
        let config_dir = dirs.config_dir();
        fs::create_dir_all(config_dir)?;
        Ok(Self::at(config_dir.join(SETTINGS_FILE)))
    }

    /// Store backed by an explicit file instead of the platform config dir.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<UserSettings, SettingsError> {
        if !self.path.exists() {
            return Ok(UserSettings::default());
        }
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let settings = serde_json::from_reader(reader)?;
        Ok(settings)
    }

    /// Like [`SettingsStore::load`], but falls back to defaults on any error.
    pub fn load_or_default(&self) -> UserSettings {
        self.load().unwrap_or_else(|err| {
            warn!("Failed to read {}: {err}; using defaults", self.path.display());
            UserSettings::default()
        })
    }

    pub fn save(&self, settings: &UserSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.path)?;
        serde_json::to_writer_pretty(file, settings)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::at(dir.path().join("settings.json"));
        let settings = store.load().unwrap();
        assert_eq!(settings, UserSettings::default());
        assert_eq!(settings.window.width, 800);
        assert_eq!(settings.mixer.min_steps, 50);
        assert_eq!(settings.mixer.max_steps, 99);
    }

    #[test]
    fn saved_settings_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::at(dir.path().join("nested").join("settings.json"));
        let mut settings = UserSettings::default();
        settings.mixer.seed = Some(7);
        settings.camera.fov_degrees = 60.0;
        store.save(&settings).unwrap();
        assert_eq!(store.load().unwrap(), settings);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "mixer": { "step_delay_ms": 0 } }"#).unwrap();
        let settings = SettingsStore::at(&path).load().unwrap();
        assert_eq!(settings.mixer.step_delay_ms, 0);
        assert_eq!(settings.mixer.max_steps, 99);
        assert_eq!(settings.camera, CameraSettings::default());
    }

    #[test]
    fn malformed_file_is_reported_then_defaulted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        let store = SettingsStore::at(&path);
        assert!(matches!(store.load(), Err(SettingsError::Json(_))));
        assert_eq!(store.load_or_default(), UserSettings::default());
    }
}
