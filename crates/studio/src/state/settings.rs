//! Application settings

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Generator service connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Full URL of the `/api/generate` endpoint
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3001/api/generate".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Opacity of masses while ghost mode is on (0.0 - 1.0)
    pub ghost_opacity: f32,
    /// Seconds a notice stays visible
    pub notice_secs: u64,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            ghost_opacity: 0.2,
            notice_secs: 3,
        }
    }
}

/// Blueprint export settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Target directory for exported blueprints; current directory if unset
    pub directory: Option<PathBuf>,
}

/// All application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioSettings {
    pub generator: GeneratorSettings,
    pub display: DisplaySettings,
    pub export: ExportSettings,
}

impl StudioSettings {
    fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "massing", "massing-studio")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file. On first run the defaults are written out
    /// so there is a file to edit.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            let settings = Self::default();
            if let Err(e) = settings.save_to(&path) {
                tracing::warn!("Failed to save settings to {}: {e}", path.display());
            }
            return settings;
        }
        Self::load_from(&path).unwrap_or_default()
    }

    /// Load settings from a specific file
    pub fn load_from(path: &Path) -> Option<Self> {
        let json = std::fs::read_to_string(path).ok()?;
        match serde_json::from_str(&json) {
            Ok(settings) => Some(settings),
            Err(e) => {
                tracing::warn!("Ignoring unreadable settings {}: {e}", path.display());
                None
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }

    /// How long a notice stays visible
    pub fn notice_ttl(&self) -> Duration {
        Duration::from_secs(self.display.notice_secs)
    }

    /// Directory blueprints are exported into
    pub fn export_dir(&self) -> PathBuf {
        self.export
            .directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
