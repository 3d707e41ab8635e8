//! Diagnostics Snapshot
//!
//! Serializable capture of everything the crash attributor reads:
//! descriptors, the per-mod type index, the method table, and the patch
//! records. The running framework can export one next to its log file, and
//! the CLI can then attribute a captured error text offline, away from the
//! game process.

use crate::diagnostics::DiagnosticService;
use anyhow::{Context, Result};
use modforge_core::{MethodTable, ModDescriptor, ModRegistry, StaticPatchRegistry, TypeIndex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Everything needed to re-run attribution outside the game process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiagnosticsSnapshot {
    /// Registered mod descriptors, in registration order
    pub mods: Vec<ModDescriptor>,
    /// Indexed type names per mod id; unindexed mods are absent
    pub types: BTreeMap<String, Vec<String>>,
    /// Known types and their methods
    pub methods: MethodTable,
    /// Installed interceptors
    pub patches: StaticPatchRegistry,
}

impl DiagnosticsSnapshot {
    /// Capture the state a diagnostics service would be built from.
    pub fn capture(
        registry: &ModRegistry,
        type_index: &TypeIndex,
        methods: &MethodTable,
        patches: &StaticPatchRegistry,
    ) -> Self {
        let mut types = BTreeMap::new();
        for mod_id in type_index.indexed_mods() {
            if let Some(names) = type_index.types_of(mod_id) {
                types.insert(mod_id.to_string(), names.to_vec());
            }
        }
        Self {
            mods: registry.entries().iter().map(|e| e.descriptor.clone()).collect(),
            types,
            methods: methods.clone(),
            patches: patches.clone(),
        }
    }

    /// Write the snapshot as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize snapshot")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write snapshot '{}'", path.display()))?;
        Ok(())
    }

    /// Read a snapshot back from JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot '{}'", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot '{}'", path.display()))
    }

    /// Rebuild a diagnostics service from the snapshot. Descriptors that
    /// fail registration (a tampered snapshot with duplicate ids) are
    /// logged and dropped, matching discovery behavior.
    pub fn into_service(self) -> DiagnosticService {
        let mut registry = ModRegistry::new();
        for descriptor in self.mods {
            let id = descriptor.id.clone();
            if let Err(e) = registry.register(descriptor) {
                log::error!("Snapshot mod '{}' rejected: {}.", id, e);
            }
        }

        let mut type_index = TypeIndex::new();
        for (mod_id, names) in self.types {
            type_index.insert(mod_id, names);
        }

        DiagnosticService::from_parts(registry, type_index, self.methods, Box::new(self.patches))
    }
}
