//! Diagnostics Service
//!
//! The error-event side of the framework. The host installs a callback
//! that forwards every runtime log event here; events severe enough to
//! matter are run through the crash attributor and the resulting report is
//! written to the log.
//!
//! The service is constructed explicitly, once, after startup completes,
//! from state that is never mutated again. Construction (including the
//! type-index build) is an ordinary observable step, not a side effect of
//! the first error. Because every field is read-only afterwards, a shared
//! `Arc<DiagnosticService>` may be invoked from any thread the host raises
//! error events on, without locking.

use modforge_core::report::render_report;
use modforge_core::{
    Attribution, Attributor, MethodTable, ModDescriptor, ModRegistry, PatchRegistry,
    TypeEnumerator, TypeIndex,
};

/// Severity of a host error event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Exception,
    Assert,
}

impl Severity {
    /// Only genuine failures are worth an attribution pass.
    pub fn triggers_attribution(self) -> bool {
        matches!(self, Severity::Error | Severity::Exception | Severity::Assert)
    }
}

/// Immutable crash-diagnostics service.
pub struct DiagnosticService {
    registry: ModRegistry,
    type_index: TypeIndex,
    method_table: MethodTable,
    patches: Box<dyn PatchRegistry>,
    self_descriptor: ModDescriptor,
}

impl DiagnosticService {
    /// Build the service, constructing the type index from the enumerator
    /// for every registered mod. Mods that cannot be enumerated end up
    /// unindexed and contribute no type evidence.
    pub fn build(
        registry: ModRegistry,
        enumerator: &dyn TypeEnumerator,
        method_table: MethodTable,
        patches: Box<dyn PatchRegistry>,
    ) -> Self {
        let mod_ids: Vec<String> = registry.ids().map(str::to_string).collect();
        let type_index = TypeIndex::build(enumerator, mod_ids.iter().map(String::as_str));
        Self::from_parts(registry, type_index, method_table, patches)
    }

    /// Assemble the service from an already-built type index, for snapshot
    /// loading and tests.
    pub fn from_parts(
        registry: ModRegistry,
        type_index: TypeIndex,
        method_table: MethodTable,
        patches: Box<dyn PatchRegistry>,
    ) -> Self {
        Self {
            registry,
            type_index,
            method_table,
            patches,
            self_descriptor: Self::self_descriptor(),
        }
    }

    /// Descriptor reported when attribution itself faults.
    fn self_descriptor() -> ModDescriptor {
        let mut descriptor = ModDescriptor::new("modforge.diagnostics");
        descriptor.display_name = Some("Mod Crash Diagnostics".to_string());
        descriptor.version = Some(env!("CARGO_PKG_VERSION").to_string());
        descriptor
    }

    /// Run one attribution pass over an error's text.
    pub fn attribute(&self, message: &str, stack_text: &str) -> Attribution {
        let attributor = Attributor::new(
            &self.registry,
            &self.type_index,
            &self.method_table,
            self.patches.as_ref(),
            &self.self_descriptor,
        );
        attributor.attribute(message, stack_text)
    }

    /// Host log callback. Attributes Error/Exception/Assert events, writes
    /// the rendered report to the log, and returns it for the caller.
    /// Lower severities and events with no identifiable suspect return
    /// `None`.
    pub fn handle(&self, message: &str, stack_text: &str, severity: Severity) -> Option<String> {
        if !severity.triggers_attribution() {
            return None;
        }
        let attribution = self.attribute(message, stack_text);
        let report = render_report(&attribution)?;
        if attribution.success {
            log::info!("{}", report);
        } else {
            log::error!("{}", report);
        }
        Some(report)
    }

    /// The mod registry the service was built over.
    pub fn registry(&self) -> &ModRegistry {
        &self.registry
    }

    /// The type index the service was built with.
    pub fn type_index(&self) -> &TypeIndex {
        &self.type_index
    }
}
