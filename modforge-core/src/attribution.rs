//! Crash Attribution
//!
//! Given the message and stack text of a runtime error, identify the set of
//! mods whose identifiers appear in that text. The result is a set of
//! plausible suspects, not a proof: matching is deliberately textual
//! because the upstream error text is unstructured free text. Absence of a
//! match never means no mod is at fault.
//!
//! Two independent evidence passes run over the text and their results are
//! merged per mod, with each mod's evidence list de-duplicated:
//!
//! - **Type-name matching** tests every indexed type name of every
//!   registered mod for substring occurrence in the message or the stack
//!   text. Short or generic type names can over-match; that
//!   precision/recall trade-off is accepted and covered in the tests.
//! - **Interceptor-name matching** scans for synthesized interceptor names
//!   (`<full.method name>_Patch<ordinal>`), resolves each token through
//!   the method lookup table, asks the patch registry who installed the
//!   interceptor with that ordinal, and charges the owning mod.
//!
//! A token the interceptor scan cannot resolve is logged and skipped. Only an internal
//! fault (a patch-registry failure, an interceptor owned by an unknown mod)
//! aborts the whole call: partial results are discarded, `success` is
//! false, and the only reported suspect is the diagnostics component
//! itself, carrying the fault description for a human maintainer.
//!
//! Attribution runs on the caller's thread, possibly during error handling
//! on a game-critical thread. Its cost is bounded by the number of indexed
//! type names times the text length for the first, and by the number of
//! regex matches times a few map lookups for the second; there is no I/O and no
//! locking.

use crate::descriptor::ModDescriptor;
use crate::error::AttributionFault;
use crate::patch::{MethodTable, PatchRegistry};
use crate::registry::ModRegistry;
use crate::type_index::TypeIndex;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Interceptor names are the target method plus this separator and an
/// ordinal, e.g. `Acme.Engine.Controller.Update_Patch3`.
const PATCH_SEPARATOR: &str = "_Patch";

/// Matches a whitespace-preceded (or text-initial) token ending in the
/// patch separator plus digits. The token itself is capture group 1.
fn patch_token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:^|\s)(\S+?_Patch\d+)").expect("patch token pattern is valid")
    })
}

/// One suspected mod with the literal evidence found for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suspect {
    pub descriptor: ModDescriptor,
    /// Literal strings from the error text linking the mod to the error,
    /// in discovery order, without repeats
    pub evidence: Vec<String>,
}

/// Output of one attribution pass.
///
/// Suspects are ordered by when they first accumulated evidence. When
/// `success` is false the single entry names the diagnostics component
/// itself and its evidence lines describe the internal fault; callers must
/// render that as a diagnostics failure, not as a real suspect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution {
    pub success: bool,
    pub suspects: Vec<Suspect>,
}

impl Attribution {
    /// Whether the pass completed and found nobody to blame.
    pub fn is_empty(&self) -> bool {
        self.success && self.suspects.is_empty()
    }
}

/// Evidence accumulator preserving first-evidence order per mod.
#[derive(Default)]
struct EvidenceMap {
    order: Vec<String>,
    by_mod: HashMap<String, Vec<String>>,
}

impl EvidenceMap {
    fn add(&mut self, mod_id: &str, evidence: String) {
        if !self.by_mod.contains_key(mod_id) {
            self.order.push(mod_id.to_string());
        }
        let list = self.by_mod.entry(mod_id.to_string()).or_default();
        if !list.contains(&evidence) {
            list.push(evidence);
        }
    }
}

/// Crash attributor over the framework's read-only startup state.
///
/// Borrows everything it reads; nothing it touches is mutated after
/// startup, so a shared attributor may be driven from any number of
/// threads concurrently.
pub struct Attributor<'a> {
    registry: &'a ModRegistry,
    type_index: &'a TypeIndex,
    method_table: &'a MethodTable,
    patches: &'a dyn PatchRegistry,
    /// Descriptor reported as the suspect when attribution itself faults
    self_descriptor: &'a ModDescriptor,
}

impl<'a> Attributor<'a> {
    pub fn new(
        registry: &'a ModRegistry,
        type_index: &'a TypeIndex,
        method_table: &'a MethodTable,
        patches: &'a dyn PatchRegistry,
        self_descriptor: &'a ModDescriptor,
    ) -> Self {
        Self { registry, type_index, method_table, patches, self_descriptor }
    }

    /// Attribute one error event.
    ///
    /// Never panics and never returns `Err`; an internal fault is folded
    /// into the returned [`Attribution`] with `success = false`.
    pub fn attribute(&self, message: &str, stack_text: &str) -> Attribution {
        match self.attribute_inner(message, stack_text) {
            Ok(suspects) => Attribution { success: true, suspects },
            Err(fault) => {
                log::error!("Attribution aborted: {}", fault);
                Attribution {
                    success: false,
                    suspects: vec![Suspect {
                        descriptor: self.self_descriptor.clone(),
                        evidence: vec![fault.message, fault.location.to_string()],
                    }],
                }
            }
        }
    }

    fn attribute_inner(
        &self,
        message: &str,
        stack_text: &str,
    ) -> Result<Vec<Suspect>, AttributionFault> {
        let mut evidence = EvidenceMap::default();

        self.match_type_names(message, stack_text, &mut evidence);
        self.match_patch_tokens(message, stack_text, &mut evidence)?;

        let mut suspects = Vec::with_capacity(evidence.order.len());
        for mod_id in &evidence.order {
            let entry = self.registry.find(mod_id).ok_or_else(|| {
                AttributionFault::new(
                    format!("suspect '{}' is not a registered mod", mod_id),
                    "suspect collection",
                )
            })?;
            let lines = evidence.by_mod.remove(mod_id).unwrap_or_default();
            suspects.push(Suspect { descriptor: entry.descriptor.clone(), evidence: lines });
        }
        Ok(suspects)
    }

    /// Substring matching of indexed type names against message and stack.
    fn match_type_names(&self, message: &str, stack_text: &str, evidence: &mut EvidenceMap) {
        for entry in self.registry.entries() {
            let Some(type_names) = self.type_index.types_of(entry.id()) else {
                continue;
            };
            for name in type_names {
                if message.contains(name.as_str()) || stack_text.contains(name.as_str()) {
                    evidence.add(entry.id(), name.clone());
                }
            }
        }
    }

    /// Synthesized interceptor-name matching over the combined text.
    fn match_patch_tokens(
        &self,
        message: &str,
        stack_text: &str,
        evidence: &mut EvidenceMap,
    ) -> Result<(), AttributionFault> {
        let combined = format!("{}{}", message, stack_text);

        for captures in patch_token_pattern().captures_iter(&combined) {
            let Some(token) = captures.get(1).map(|m| m.as_str()) else {
                continue;
            };
            let Some((type_name, method_name, ordinal)) = split_patch_token(token) else {
                log::warn!("Cannot split synthesized name '{}'.", token);
                continue;
            };

            if !self.method_table.has_type(type_name) {
                log::warn!("Cannot resolve type '{}' for '{}'.", type_name, token);
                continue;
            }
            if !self.method_table.has_method(type_name, method_name) {
                log::warn!(
                    "Cannot resolve method '{}' on '{}' for '{}'.",
                    method_name,
                    type_name,
                    token
                );
                continue;
            }

            let records = self
                .patches
                .patches_for(type_name, method_name)
                .map_err(|e| AttributionFault::new(e.to_string(), "patch registry query"))?;

            for record in records.iter().filter(|r| r.index == ordinal) {
                if !self.registry.contains(&record.owner) {
                    return Err(AttributionFault::new(
                        format!(
                            "interceptor on {}.{} is owned by unknown mod '{}'",
                            type_name, method_name, record.owner
                        ),
                        "interceptor owner lookup",
                    ));
                }
                evidence.add(&record.owner, format!("{}.{}()", token, record.kind));
            }
        }

        Ok(())
    }
}

/// Split `Namespace.Type.Method_Patch3` into declaring type, method name,
/// and ordinal. Returns `None` for tokens that only look synthesized (no
/// dot before the separator, ordinal out of range).
fn split_patch_token(token: &str) -> Option<(&str, &str, u32)> {
    let separator = token.rfind(PATCH_SEPARATOR)?;
    let base = &token[..separator];
    let ordinal: u32 = token[separator + PATCH_SEPARATOR.len()..].parse().ok()?;
    let dot = base.rfind('.')?;
    let (type_name, method_name) = (&base[..dot], &base[dot + 1..]);
    if type_name.is_empty() || method_name.is_empty() {
        return None;
    }
    Some((type_name, method_name, ordinal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PatchQueryError;
    use crate::patch::{PatchKind, PatchRecord, StaticPatchRegistry};

    fn fixture() -> (ModRegistry, TypeIndex, MethodTable, StaticPatchRegistry, ModDescriptor) {
        let mut registry = ModRegistry::new();
        let mut mymod = ModDescriptor::new("mymod");
        mymod.display_name = Some("My Mod".to_string());
        registry.register(mymod).unwrap();
        registry.register(ModDescriptor::new("patchmod")).unwrap();

        let mut index = TypeIndex::new();
        index.insert("mymod", vec!["Acme.Engine.Controller".to_string()]);
        index.insert("patchmod", vec!["PatchMod.Entry".to_string()]);

        let mut table = MethodTable::new();
        table.register_method("Acme.Engine.Controller", "Update");

        let mut patches = StaticPatchRegistry::new();
        patches.add(PatchRecord {
            owner: "patchmod".to_string(),
            target_type: "Acme.Engine.Controller".to_string(),
            target_method: "Update".to_string(),
            kind: PatchKind::Before,
            index: 1,
        });

        let host = ModDescriptor::new("modforge.diagnostics");
        (registry, index, table, patches, host)
    }

    fn evidence_for<'r>(result: &'r Attribution, id: &str) -> &'r [String] {
        &result
            .suspects
            .iter()
            .find(|s| s.descriptor.id == id)
            .unwrap_or_else(|| panic!("no suspect '{}'", id))
            .evidence
    }

    #[test]
    fn test_type_name_substring_is_evidence() {
        let (registry, index, table, patches, host) = fixture();
        let attributor = Attributor::new(&registry, &index, &table, &patches, &host);

        let result = attributor.attribute(
            "NullReferenceException in Acme.Engine.Controller.Update",
            "",
        );

        assert!(result.success);
        assert_eq!(
            evidence_for(&result, "mymod"),
            &["Acme.Engine.Controller".to_string()]
        );
    }

    #[test]
    fn test_interceptor_token_is_traced_to_owner() {
        let (registry, index, table, patches, host) = fixture();
        let attributor = Attributor::new(&registry, &index, &table, &patches, &host);

        let result = attributor.attribute(
            "error",
            "  at Acme.Engine.Controller.Update_Patch1 (...)",
        );

        assert!(result.success);
        assert_eq!(
            evidence_for(&result, "patchmod"),
            &["Acme.Engine.Controller.Update_Patch1.Before()".to_string()]
        );
    }

    #[test]
    fn test_evidence_is_deduplicated() {
        let (registry, index, table, patches, host) = fixture();
        let attributor = Attributor::new(&registry, &index, &table, &patches, &host);

        // Same type name in both message and stack, same token twice.
        let result = attributor.attribute(
            "Acme.Engine.Controller threw at Acme.Engine.Controller.Update_Patch1",
            "Acme.Engine.Controller in Acme.Engine.Controller.Update_Patch1",
        );

        assert!(result.success);
        assert_eq!(
            evidence_for(&result, "mymod"),
            &["Acme.Engine.Controller".to_string()]
        );
        assert_eq!(
            evidence_for(&result, "patchmod"),
            &["Acme.Engine.Controller.Update_Patch1.Before()".to_string()]
        );
    }

    #[test]
    fn test_unresolvable_token_is_skipped_not_fatal() {
        let (registry, index, table, patches, host) = fixture();
        let attributor = Attributor::new(&registry, &index, &table, &patches, &host);

        let result = attributor.attribute("", " Ghost.Type.Method_Patch2 exploded");

        assert!(result.success);
        assert!(result.suspects.is_empty());
    }

    #[test]
    fn test_wrong_ordinal_matches_nothing() {
        let (registry, index, table, patches, host) = fixture();
        let attributor = Attributor::new(&registry, &index, &table, &patches, &host);

        let result = attributor.attribute("", " Acme.Engine.Controller.Update_Patch7");

        assert!(result.success);
        assert!(result.suspects.is_empty());
    }

    #[test]
    fn test_suspects_keep_first_evidence_order() {
        let (registry, index, table, patches, host) = fixture();
        let attributor = Attributor::new(&registry, &index, &table, &patches, &host);

        // patchmod's own type appears before mymod's in the text, but the
        // type-name scan walks mods in registration order, so mymod is
        // charged first.
        let result = attributor.attribute("PatchMod.Entry then Acme.Engine.Controller", "");

        assert!(result.success);
        let ids: Vec<&str> = result.suspects.iter().map(|s| s.descriptor.id.as_str()).collect();
        assert_eq!(ids, vec!["mymod", "patchmod"]);
    }

    struct FailingRegistry;

    impl PatchRegistry for FailingRegistry {
        fn patches_for(
            &self,
            target_type: &str,
            target_method: &str,
        ) -> Result<Vec<PatchRecord>, PatchQueryError> {
            Err(PatchQueryError {
                target_type: target_type.to_string(),
                target_method: target_method.to_string(),
                message: "registry corrupted".to_string(),
            })
        }
    }

    #[test]
    fn test_internal_fault_discards_partial_result() {
        let (registry, index, table, _, host) = fixture();
        let failing = FailingRegistry;
        let attributor = Attributor::new(&registry, &index, &table, &failing, &host);

        // The type-name scan would have charged mymod, but the patch
        // registry fault must win and discard it.
        let result = attributor.attribute(
            "Acme.Engine.Controller",
            " Acme.Engine.Controller.Update_Patch1",
        );

        assert!(!result.success);
        assert_eq!(result.suspects.len(), 1);
        assert_eq!(result.suspects[0].descriptor.id, "modforge.diagnostics");
        assert!(result.suspects[0]
            .evidence
            .iter()
            .any(|line| line.contains("registry corrupted")));
    }

    #[test]
    fn test_unknown_interceptor_owner_is_a_fault() {
        let (mut registry, index, table, patches, host) = fixture();
        // Rebuild the registry without patchmod so the owner lookup fails.
        registry = {
            let mut fresh = ModRegistry::new();
            for entry in registry.entries() {
                if entry.id() != "patchmod" {
                    fresh.register(entry.descriptor.clone()).unwrap();
                }
            }
            fresh
        };
        let attributor = Attributor::new(&registry, &index, &table, &patches, &host);

        let result = attributor.attribute("", " Acme.Engine.Controller.Update_Patch1");

        assert!(!result.success);
        assert_eq!(result.suspects[0].descriptor.id, "modforge.diagnostics");
    }

    #[test]
    fn test_attribution_is_idempotent() {
        let (registry, index, table, patches, host) = fixture();
        let attributor = Attributor::new(&registry, &index, &table, &patches, &host);

        let message = "Acme.Engine.Controller failed";
        let stack = " Acme.Engine.Controller.Update_Patch1 (at Update)";
        let first = attributor.attribute(message, stack);
        let second = attributor.attribute(message, stack);

        assert_eq!(first, second);
    }

    #[test]
    fn test_short_type_names_can_overmatch() {
        // Substring matching is intentional: a generic type name matches
        // unrelated text that merely contains it.
        let mut registry = ModRegistry::new();
        registry.register(ModDescriptor::new("genericmod")).unwrap();
        let mut index = TypeIndex::new();
        index.insert("genericmod", vec!["Data".to_string()]);
        let table = MethodTable::new();
        let patches = StaticPatchRegistry::new();
        let host = ModDescriptor::new("modforge.diagnostics");
        let attributor = Attributor::new(&registry, &index, &table, &patches, &host);

        let result = attributor.attribute("Corrupted savegame Database entry", "");

        assert!(result.success);
        assert_eq!(evidence_for(&result, "genericmod"), &["Data".to_string()]);
    }

    #[test]
    fn test_split_patch_token() {
        assert_eq!(
            split_patch_token("Acme.Engine.Controller.Update_Patch3"),
            Some(("Acme.Engine.Controller", "Update", 3))
        );
        // No dot before the separator.
        assert_eq!(split_patch_token("Update_Patch3"), None);
        // Ordinal too large for u32 is a miss, not a fault.
        assert_eq!(split_patch_token("A.B_Patch99999999999999999999"), None);
    }
}
