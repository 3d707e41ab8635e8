//! Patch Metadata
//!
//! Interceptors ("patches") are installed on target methods by an external
//! patching engine. The engine names each generated interceptor by a fixed
//! synthetic convention: the fully-qualified target method followed by
//! `_Patch` and an ordinal, e.g. `Acme.Engine.Controller.Update_Patch1`.
//! Those synthesized names are what crash stacks actually contain, so the
//! attributor has to walk them back to the owning mod.
//!
//! This module holds the read-only view the core needs: the record shape,
//! the query trait answered by the external patch registry, and the method
//! lookup table built once at load time so attribution never has to resolve
//! names reflectively on an error path.

use crate::error::PatchQueryError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Whether an interceptor runs before or after its target method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatchKind {
    Before,
    After,
}

impl fmt::Display for PatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchKind::Before => write!(f, "Before"),
            PatchKind::After => write!(f, "After"),
        }
    }
}

/// One installed interceptor on a target method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchRecord {
    /// Id of the mod that installed the interceptor
    pub owner: String,
    /// Fully-qualified declaring type of the target method
    pub target_type: String,
    /// Target method name
    pub target_method: String,
    /// Before or after the target
    pub kind: PatchKind,
    /// Ordinal embedded in the synthesized interceptor name
    pub index: u32,
}

/// Read-only query interface to the external patch registry.
///
/// A method with nothing installed answers `Ok` with an empty list; `Err`
/// means the registry itself is inconsistent and the caller cannot trust
/// any partial answer.
pub trait PatchRegistry: Send + Sync {
    /// All interceptors installed on the given method, in install order.
    fn patches_for(
        &self,
        target_type: &str,
        target_method: &str,
    ) -> Result<Vec<PatchRecord>, PatchQueryError>;
}

/// In-memory patch registry.
///
/// Backs the diagnostics snapshot and tests; a live embedding would answer
/// [`PatchRegistry`] straight from the patching engine instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticPatchRegistry {
    records: Vec<PatchRecord>,
}

impl StaticPatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record.
    pub fn add(&mut self, record: PatchRecord) {
        self.records.push(record);
    }

    /// All records, in insertion order.
    pub fn records(&self) -> &[PatchRecord] {
        &self.records
    }
}

impl PatchRegistry for StaticPatchRegistry {
    fn patches_for(
        &self,
        target_type: &str,
        target_method: &str,
    ) -> Result<Vec<PatchRecord>, PatchQueryError> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.target_type == target_type && r.target_method == target_method)
            .cloned()
            .collect())
    }
}

/// Lookup table from fully-qualified type names to their method names.
///
/// Built once while code units load, from the same enumeration that feeds
/// the type index. Resolving a synthesized interceptor name against it is a
/// plain map lookup; a name that is not present is a miss, not a fault.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MethodTable {
    methods_by_type: HashMap<String, BTreeSet<String>>,
}

impl MethodTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type with no methods yet.
    pub fn register_type(&mut self, type_name: impl Into<String>) {
        self.methods_by_type.entry(type_name.into()).or_default();
    }

    /// Register a method on a type, creating the type entry if needed.
    pub fn register_method(&mut self, type_name: impl Into<String>, method_name: impl Into<String>) {
        self.methods_by_type
            .entry(type_name.into())
            .or_default()
            .insert(method_name.into());
    }

    /// Whether a type with this fully-qualified name is known.
    pub fn has_type(&self, type_name: &str) -> bool {
        self.methods_by_type.contains_key(type_name)
    }

    /// Whether the given type declares the given method, any visibility.
    pub fn has_method(&self, type_name: &str, method_name: &str) -> bool {
        self.methods_by_type
            .get(type_name)
            .map_or(false, |methods| methods.contains(method_name))
    }

    /// Number of known types.
    pub fn len(&self) -> usize {
        self.methods_by_type.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.methods_by_type.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_table_lookup() {
        let mut table = MethodTable::new();
        table.register_method("Acme.Engine.Controller", "Update");
        table.register_type("Acme.Engine.Empty");

        assert!(table.has_type("Acme.Engine.Controller"));
        assert!(table.has_method("Acme.Engine.Controller", "Update"));
        assert!(!table.has_method("Acme.Engine.Controller", "Render"));
        assert!(table.has_type("Acme.Engine.Empty"));
        assert!(!table.has_type("Acme.Engine.Missing"));
    }

    #[test]
    fn test_static_registry_filters_by_method() {
        let mut registry = StaticPatchRegistry::new();
        registry.add(PatchRecord {
            owner: "patchmod".to_string(),
            target_type: "Game.World".to_string(),
            target_method: "Tick".to_string(),
            kind: PatchKind::Before,
            index: 1,
        });
        registry.add(PatchRecord {
            owner: "othermod".to_string(),
            target_type: "Game.World".to_string(),
            target_method: "Save".to_string(),
            kind: PatchKind::After,
            index: 0,
        });

        let hits = registry.patches_for("Game.World", "Tick").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].owner, "patchmod");
    }
}
