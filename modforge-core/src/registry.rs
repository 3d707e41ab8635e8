//! Mod Registry
//!
//! Insertion-ordered collection of every mod known to the framework. The
//! registry is filled once during startup from discovered descriptors and
//! is read-only afterwards; the attributor and the report renderer both
//! resolve mod ids through it.
//!
//! Registration enforces id uniqueness: the first descriptor wins and the
//! second registration under the same id is rejected. Rejections are
//! per-mod and never stop the caller from processing the rest.

use crate::descriptor::ModDescriptor;
use crate::error::CoreError;
use std::collections::HashMap;

/// Runtime state wrapper around one registered mod.
#[derive(Debug, Clone)]
pub struct ModEntry {
    /// Static metadata, immutable after registration
    pub descriptor: ModDescriptor,
    /// Whether the user wants this mod loaded
    pub enabled: bool,
    /// Whether the mod was actually activated this session
    pub active: bool,
    /// Whether activation was attempted and failed
    pub error_on_loading: bool,
}

impl ModEntry {
    fn new(descriptor: ModDescriptor) -> Self {
        Self {
            descriptor,
            enabled: true,
            active: false,
            error_on_loading: false,
        }
    }

    /// Mod id shorthand.
    pub fn id(&self) -> &str {
        &self.descriptor.id
    }
}

/// Registry of all known mods, in discovery order.
#[derive(Debug, Default)]
pub struct ModRegistry {
    entries: Vec<ModEntry>,
    index: HashMap<String, usize>,
}

impl ModRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a discovered descriptor.
    ///
    /// Rejects descriptors with an empty id and descriptors whose id is
    /// already taken; both rejections leave the registry unchanged.
    pub fn register(&mut self, mut descriptor: ModDescriptor) -> Result<(), CoreError> {
        if descriptor.id.is_empty() {
            return Err(CoreError::MissingModId);
        }
        if self.index.contains_key(&descriptor.id) {
            return Err(CoreError::DuplicateModId { id: descriptor.id });
        }
        descriptor.normalize();
        self.index.insert(descriptor.id.clone(), self.entries.len());
        self.entries.push(ModEntry::new(descriptor));
        Ok(())
    }

    /// Find a mod by id.
    pub fn find(&self, id: &str) -> Option<&ModEntry> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    /// Find a mod by id, mutably.
    pub fn find_mut(&mut self, id: &str) -> Option<&mut ModEntry> {
        self.index.get(id).map(|&i| &mut self.entries[i])
    }

    /// Whether a mod with this id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All entries in registration order.
    pub fn entries(&self) -> &[ModEntry] {
        &self.entries
    }

    /// All entries in registration order, mutably.
    pub fn entries_mut(&mut self) -> &mut [ModEntry] {
        &mut self.entries
    }

    /// Registered mod ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.id())
    }

    /// Number of registered mods.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_find() {
        let mut registry = ModRegistry::new();
        registry.register(ModDescriptor::new("alpha")).unwrap();
        registry.register(ModDescriptor::new("beta")).unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.find("alpha").is_some());
        assert!(registry.find("gamma").is_none());
        let ids: Vec<&str> = registry.ids().collect();
        assert_eq!(ids, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_duplicate_id_rejected_first_wins() {
        let mut registry = ModRegistry::new();
        let mut first = ModDescriptor::new("alpha");
        first.author = Some("original".to_string());
        registry.register(first).unwrap();

        let mut second = ModDescriptor::new("alpha");
        second.author = Some("impostor".to_string());
        assert_eq!(
            registry.register(second),
            Err(CoreError::DuplicateModId { id: "alpha".to_string() })
        );

        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.find("alpha").unwrap().descriptor.author.as_deref(),
            Some("original")
        );
    }

    #[test]
    fn test_missing_id_rejected() {
        let mut registry = ModRegistry::new();
        assert_eq!(
            registry.register(ModDescriptor::new("")),
            Err(CoreError::MissingModId)
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_normalizes_assembly_name() {
        let mut registry = ModRegistry::new();
        registry.register(ModDescriptor::new("alpha")).unwrap();
        assert_eq!(
            registry.find("alpha").unwrap().descriptor.assembly_name.as_deref(),
            Some("alpha.dll")
        );
    }
}
