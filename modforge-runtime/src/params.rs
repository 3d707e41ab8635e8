// Persisted enable/disable state per mod
use anyhow::{Context, Result};
use modforge_core::ModRegistry;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One persisted switch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModParam {
    pub id: String,
    pub enabled: bool,
}

/// The user's enable/disable choices, loaded before activation and saved
/// whenever they change in the manager UI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModParams {
    pub mods: Vec<ModParam>,
}

impl ModParams {
    /// Load params from a JSON file, falling back to empty (everything
    /// enabled) when the file does not exist or cannot be read.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::error!("Can't parse params file '{}': {}.", path.display(), e);
                Self::default()
            }),
            Err(e) => {
                log::error!("Can't read params file '{}': {}.", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save params to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).context("Failed to serialize params")?;
        std::fs::write(path, content)
            .with_context(|| format!("Can't write params file '{}'", path.display()))?;
        Ok(())
    }

    /// Capture the current enabled flags of every registered mod.
    pub fn capture(registry: &ModRegistry) -> Self {
        Self {
            mods: registry
                .entries()
                .iter()
                .map(|entry| ModParam { id: entry.id().to_string(), enabled: entry.enabled })
                .collect(),
        }
    }

    /// Apply the persisted switches to the registry. Ids that no longer
    /// match an installed mod are ignored.
    pub fn apply(&self, registry: &mut ModRegistry) {
        for param in &self.mods {
            if let Some(entry) = registry.find_mut(&param.id) {
                entry.enabled = param.enabled;
            }
        }
    }
}
