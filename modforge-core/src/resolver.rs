//! Dependency Resolver
//!
//! Computes the activation order for a set of registered mods so that every
//! mod comes after all of its requirements that are actually present.
//! Requirements naming a mod that is not registered are soft: they are
//! skipped silently and never fail resolution.
//!
//! The traversal is an iterative depth-first postorder with three node
//! states (unvisited, in progress, emitted). Reaching a node that is still
//! in progress means the requirement graph has a cycle; that is a hard
//! error carrying the ids on the cycle, since activation order is undefined
//! for its members. Mods with no dependency relationship keep their
//! registration order relative to each other.

use crate::descriptor::ModVersion;
use crate::error::CoreError;
use crate::registry::ModRegistry;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    InProgress,
    Emitted,
}

/// Resolve the activation order for all registered mods.
///
/// Returns mod ids in a valid topological order restricted to present
/// requirements, or [`CoreError::DependencyCycle`] naming the members of a
/// requirement cycle.
pub fn resolve(registry: &ModRegistry) -> Result<Vec<String>, CoreError> {
    let mut order: Vec<String> = Vec::with_capacity(registry.len());
    let mut states: HashMap<&str, VisitState> = HashMap::with_capacity(registry.len());

    for root in registry.ids() {
        if states.contains_key(root) {
            continue;
        }
        visit(root, registry, &mut states, &mut order)?;
    }

    check_requirement_versions(registry);

    Ok(order)
}

/// One explicit stack frame: a mod id and the present requirements still
/// left to visit below it.
struct Frame<'a> {
    id: &'a str,
    requirements: Vec<&'a str>,
    next: usize,
}

fn visit<'a>(
    root: &'a str,
    registry: &'a ModRegistry,
    states: &mut HashMap<&'a str, VisitState>,
    order: &mut Vec<String>,
) -> Result<(), CoreError> {
    let mut stack: Vec<Frame<'a>> = vec![push_frame(root, registry, states)];

    while let Some(frame) = stack.last_mut() {
        if frame.next >= frame.requirements.len() {
            states.insert(frame.id, VisitState::Emitted);
            order.push(frame.id.to_string());
            stack.pop();
            continue;
        }

        let requirement = frame.requirements[frame.next];
        frame.next += 1;

        match states.get(requirement) {
            Some(VisitState::Emitted) => {}
            Some(VisitState::InProgress) => {
                return Err(CoreError::DependencyCycle {
                    cycle: cycle_members(&stack, requirement),
                });
            }
            None => stack.push(push_frame(requirement, registry, states)),
        }
    }

    Ok(())
}

fn push_frame<'a>(
    id: &'a str,
    registry: &'a ModRegistry,
    states: &mut HashMap<&'a str, VisitState>,
) -> Frame<'a> {
    states.insert(id, VisitState::InProgress);
    let requirements = registry
        .find(id)
        .map(|entry| {
            entry
                .descriptor
                .requirements
                .keys()
                .map(String::as_str)
                .filter(|req| registry.contains(req))
                .collect()
        })
        .unwrap_or_default();
    Frame { id, requirements, next: 0 }
}

/// Extract the cycle from the DFS stack: everything from the first
/// occurrence of `offender` down, closed by `offender` itself.
fn cycle_members(stack: &[Frame<'_>], offender: &str) -> Vec<String> {
    let start = stack.iter().position(|f| f.id == offender).unwrap_or(0);
    let mut cycle: Vec<String> = stack[start..].iter().map(|f| f.id.to_string()).collect();
    cycle.push(offender.to_string());
    cycle
}

/// Warn about present requirements older than the stated minimum version.
/// Version mismatches never fail resolution; the mod author asked for a
/// minimum, the user gets a log line to act on.
fn check_requirement_versions(registry: &ModRegistry) {
    for entry in registry.entries() {
        for (req_id, min_version) in &entry.descriptor.requirements {
            let (Some(min), Some(required)) = (min_version, registry.find(req_id)) else {
                continue;
            };
            let found = required.descriptor.parsed_version().unwrap_or(ModVersion::ZERO);
            let wanted = ModVersion::parse(min);
            if found < wanted {
                log::warn!(
                    "Mod '{}' requires '{}' {} or newer, found {}.",
                    entry.id(),
                    req_id,
                    wanted,
                    found
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ModDescriptor;

    fn mod_with_requirements(id: &str, requirements: &[&str]) -> ModDescriptor {
        let mut descriptor = ModDescriptor::new(id);
        for req in requirements {
            descriptor.requirements.insert(req.to_string(), None);
        }
        descriptor
    }

    fn registry_of(descriptors: Vec<ModDescriptor>) -> ModRegistry {
        let mut registry = ModRegistry::new();
        for descriptor in descriptors {
            registry.register(descriptor).unwrap();
        }
        registry
    }

    fn position(order: &[String], id: &str) -> usize {
        order.iter().position(|m| m == id).unwrap()
    }

    #[test]
    fn test_requirements_come_first() {
        let registry = registry_of(vec![
            mod_with_requirements("ui_overhaul", &["base_lib", "textures"]),
            mod_with_requirements("textures", &["base_lib"]),
            mod_with_requirements("base_lib", &[]),
        ]);

        let order = resolve(&registry).unwrap();
        assert_eq!(order.len(), 3);
        assert!(position(&order, "base_lib") < position(&order, "textures"));
        assert!(position(&order, "textures") < position(&order, "ui_overhaul"));
    }

    #[test]
    fn test_independent_mods_keep_registration_order() {
        let registry = registry_of(vec![
            mod_with_requirements("first", &[]),
            mod_with_requirements("second", &[]),
            mod_with_requirements("third", &[]),
        ]);

        let order = resolve(&registry).unwrap();
        assert_eq!(order, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_absent_requirement_is_ignored() {
        let registry = registry_of(vec![mod_with_requirements("lonely", &["not_installed"])]);

        let order = resolve(&registry).unwrap();
        assert_eq!(order, vec!["lonely"]);
    }

    #[test]
    fn test_cycle_is_reported_not_recursed() {
        let registry = registry_of(vec![
            mod_with_requirements("a", &["b"]),
            mod_with_requirements("b", &["c"]),
            mod_with_requirements("c", &["a"]),
        ]);

        let err = resolve(&registry).unwrap_err();
        match err {
            CoreError::DependencyCycle { cycle } => {
                assert_eq!(cycle.first(), cycle.last());
                assert!(cycle.len() >= 4);
                for id in ["a", "b", "c"] {
                    assert!(cycle.iter().any(|m| m == id), "cycle missing {}", id);
                }
            }
            other => panic!("expected DependencyCycle, got {:?}", other),
        }
    }

    #[test]
    fn test_self_requirement_is_a_cycle() {
        let registry = registry_of(vec![mod_with_requirements("selfish", &["selfish"])]);

        let err = resolve(&registry).unwrap_err();
        assert_eq!(
            err,
            CoreError::DependencyCycle {
                cycle: vec!["selfish".to_string(), "selfish".to_string()]
            }
        );
    }

    #[test]
    fn test_diamond_resolves_once() {
        let registry = registry_of(vec![
            mod_with_requirements("top", &["left", "right"]),
            mod_with_requirements("left", &["base"]),
            mod_with_requirements("right", &["base"]),
            mod_with_requirements("base", &[]),
        ]);

        let order = resolve(&registry).unwrap();
        assert_eq!(order.len(), 4);
        assert_eq!(order.iter().filter(|m| m.as_str() == "base").count(), 1);
        assert!(position(&order, "base") < position(&order, "left"));
        assert!(position(&order, "base") < position(&order, "right"));
        assert!(position(&order, "left") < position(&order, "top"));
        assert!(position(&order, "right") < position(&order, "top"));
    }
}
