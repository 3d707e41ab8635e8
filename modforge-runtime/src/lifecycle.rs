//! Lifecycle Coordinator
//!
//! Sequences startup: consume discovered descriptors, fix the activation
//! order, apply the user's enable/disable state, then activate mods one by
//! one through the host's activation hook. Ordering matters here:
//! resolution and state application both complete before the first
//! activation, because activation assumes dependency order and assumes the
//! enabled flags are final.
//!
//! Per-mod failures never stop the sequence. A rejected descriptor or a
//! failed activation is logged and the remaining mods keep going; only an
//! unresolvable requirement cycle aborts startup, because no valid order
//! exists for any of the cycle's members.

use crate::discovery::Discovered;
use crate::params::ModParams;
use modforge_core::{resolve, CoreError, ModEntry, ModRegistry};

/// Host-supplied activation step: load the mod's code unit and invoke its
/// entry method. Implemented by the embedding framework.
pub trait ActivationHook {
    fn activate(&mut self, entry: &ModEntry) -> anyhow::Result<()>;
}

impl<F> ActivationHook for F
where
    F: FnMut(&ModEntry) -> anyhow::Result<()>,
{
    fn activate(&mut self, entry: &ModEntry) -> anyhow::Result<()> {
        self(entry)
    }
}

/// Counts reported at the end of startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupSummary {
    /// Mod directories that carried a descriptor file
    pub found: usize,
    /// Descriptors that passed registration
    pub registered: usize,
    /// Mods that activated successfully
    pub activated: usize,
    /// The resolved activation order
    pub order: Vec<String>,
}

/// Startup sequencer for the mod framework.
#[derive(Debug, Default)]
pub struct Coordinator {
    registry: ModRegistry,
    found: usize,
}

impl Coordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Step (a): register discovered descriptors, rejecting duplicates and
    /// descriptors without an id. Rejections are logged and skipped.
    pub fn register_discovered(&mut self, discovered: Discovered) {
        self.found += discovered.candidates;
        for descriptor in discovered.descriptors {
            let id = descriptor.id.clone();
            if let Err(e) = self.registry.register(descriptor) {
                match e {
                    CoreError::MissingModId => log::error!("Mod descriptor has no id."),
                    _ => log::error!("Rejecting mod '{}': {}.", id, e),
                }
            }
        }
    }

    /// Steps (b)-(e): resolve order, apply enable/disable state, activate
    /// every enabled mod in order, and report counts.
    pub fn start(
        &mut self,
        params: &ModParams,
        hook: &mut dyn ActivationHook,
    ) -> Result<StartupSummary, CoreError> {
        log::info!("Sorting mods.");
        let order = resolve(&self.registry)?;

        params.apply(&mut self.registry);

        log::info!("Loading mods.");
        for id in &order {
            let Some(entry) = self.registry.find(id) else {
                continue;
            };
            if !entry.enabled {
                log::info!("Mod '{}' skipped (disabled).", id);
                continue;
            }
            let result = hook.activate(entry);
            let Some(entry) = self.registry.find_mut(id) else {
                continue;
            };
            match result {
                Ok(()) => entry.active = true,
                Err(e) => {
                    entry.error_on_loading = true;
                    log::error!("Error loading mod '{}': {:#}.", id, e);
                }
            }
        }

        let summary = StartupSummary {
            found: self.found,
            registered: self.registry.len(),
            activated: self.registry.entries().iter().filter(|e| e.active).count(),
            order,
        };
        log::info!(
            "{}",
            format!(
                "Finish. Successfully activated {}/{} mods.",
                summary.activated, summary.found
            )
            .to_uppercase()
        );
        Ok(summary)
    }

    /// The registry in its current state.
    pub fn registry(&self) -> &ModRegistry {
        &self.registry
    }

    /// Hand the registry over, for building the diagnostics service once
    /// startup is done.
    pub fn into_registry(self) -> ModRegistry {
        self.registry
    }
}
