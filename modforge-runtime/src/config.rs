// Host configuration
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Per-game host configuration the framework is embedded with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Game name, for logs only
    pub name: String,
    /// Directory scanned for mods, relative to the game working directory
    pub mods_directory: PathBuf,
    /// Descriptor file name expected inside each mod directory
    pub descriptor_file: String,
    /// Entry point the injector patches, `Namespace.Type.Method` form
    #[serde(default)]
    pub entry_point: Option<String>,
    /// Member read to detect the game version
    #[serde(default)]
    pub game_version_point: Option<String>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            name: "unknown game".to_string(),
            mods_directory: PathBuf::from("Mods"),
            descriptor_file: "Info.json".to_string(),
            entry_point: None,
            game_version_point: None,
        }
    }
}

impl HostConfig {
    /// Load the configuration from a JSON file, falling back to defaults
    /// when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: HostConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }
}
