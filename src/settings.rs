use crate::config::{merge, AnimationConfig, PartialAnimationConfig};
use crate::viewport::ViewportSettings;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Contents of `config.toml`
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub view: ViewSettings,
    #[serde(default)]
    pub globe: PartialAnimationConfig,
    #[serde(default)]
    pub viewport: ViewportSettings,
}

/// `[view]` section; every key optional
#[derive(Debug, Default, Deserialize)]
pub struct ViewSettings {
    pub color: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub altitude: Option<f64>, // km
    pub mission: Option<String>,
}

/// Everything the settings form edits and the HUD shows
#[derive(Clone, Debug, PartialEq)]
pub struct SceneSettings {
    pub color: String,
    pub lat: f64,
    pub lng: f64,
    pub altitude_km: f64,
    pub mission: String,
    pub globe: AnimationConfig,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            color: "#3b42ec".to_string(),
            lat: 22.3193, // Hong Kong
            lng: 114.1694,
            altitude_km: 1000.0,
            mission: "Orbital overview".to_string(),
            globe: AnimationConfig::default(),
        }
    }
}

impl Settings {
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), error = %err, "invalid settings file, using defaults");
                Self::default()
            }),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "cannot read settings file");
                Self::default()
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("flightglobe")
            .join("config.toml")
    }

    /// Initial scene state: defaults overlaid with the file's values
    pub fn scene(&self) -> SceneSettings {
        let defaults = SceneSettings::default();
        let view = &self.view;
        SceneSettings {
            color: view.color.clone().unwrap_or(defaults.color),
            lat: view.lat.unwrap_or(defaults.lat),
            lng: view.lng.unwrap_or(defaults.lng),
            altitude_km: view.altitude.unwrap_or(defaults.altitude_km),
            mission: view.mission.clone().unwrap_or(defaults.mission),
            globe: merge(&defaults.globe, &self.globe),
        }
    }
}
