//! Type Index
//!
//! Per-mod cache of the fully-qualified type names a mod's loaded code unit
//! declares. The index is built exactly once per mod, right after the code
//! unit loads, and is read-only afterwards; the crash attributor scans it
//! on every error event.
//!
//! Enumeration can fail (a code unit that cannot be inspected). A mod whose
//! enumeration failed is recorded as unindexed and simply contributes zero
//! candidates to attribution; it is never an error.

use std::collections::HashMap;

/// Collaborator that enumerates the exported type names of a loaded code
/// unit. Implemented by the embedding framework; test code uses closures.
pub trait TypeEnumerator {
    /// All fully-qualified type names declared by the given mod's code
    /// unit, in declaration order.
    fn enumerate_types(&self, mod_id: &str) -> anyhow::Result<Vec<String>>;
}

impl<F> TypeEnumerator for F
where
    F: Fn(&str) -> anyhow::Result<Vec<String>>,
{
    fn enumerate_types(&self, mod_id: &str) -> anyhow::Result<Vec<String>> {
        self(mod_id)
    }
}

/// Cache of declared type names per mod.
#[derive(Debug, Default)]
pub struct TypeIndex {
    types_by_mod: HashMap<String, Vec<String>>,
}

impl TypeIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index for every given mod id using the enumerator.
    ///
    /// Mods whose enumeration fails are logged and recorded unindexed.
    pub fn build<'a>(
        enumerator: &dyn TypeEnumerator,
        mod_ids: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let mut index = Self::new();
        for mod_id in mod_ids {
            index.index_mod(mod_id, enumerator);
        }
        index
    }

    /// Index a single mod. Called once per mod during startup; indexing the
    /// same id again replaces the previous record.
    pub fn index_mod(&mut self, mod_id: &str, enumerator: &dyn TypeEnumerator) {
        match enumerator.enumerate_types(mod_id) {
            Ok(mut names) => {
                names.dedup();
                self.types_by_mod.insert(mod_id.to_string(), names);
            }
            Err(e) => {
                log::error!("Cannot enumerate types for mod '{}': {:#}", mod_id, e);
                log::error!("Mod '{}' will not contribute type evidence.", mod_id);
            }
        }
    }

    /// Record an already-enumerated type list, for snapshot loading.
    pub fn insert(&mut self, mod_id: impl Into<String>, type_names: Vec<String>) {
        self.types_by_mod.insert(mod_id.into(), type_names);
    }

    /// Declared type names for a mod, or `None` if the mod is unindexed.
    pub fn types_of(&self, mod_id: &str) -> Option<&[String]> {
        self.types_by_mod.get(mod_id).map(Vec::as_slice)
    }

    /// Ids of all indexed mods.
    pub fn indexed_mods(&self) -> impl Iterator<Item = &str> {
        self.types_by_mod.keys().map(String::as_str)
    }

    /// Number of indexed mods.
    pub fn len(&self) -> usize {
        self.types_by_mod.len()
    }

    /// Whether no mod has been indexed.
    pub fn is_empty(&self) -> bool {
        self.types_by_mod.is_empty()
    }
}
