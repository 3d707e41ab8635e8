//! Runtime Layer of the Mod Framework
//!
//! Everything that surrounds the core algorithms when the framework runs
//! inside a game process: discovering mods on disk, sequencing startup,
//! applying the user's enable/disable choices, and turning runtime error
//! events into attribution reports.
//!
//! # Overview
//!
//! - [`config`]: Host configuration (game name, mods directory, descriptor
//!   file name)
//! - [`discovery`]: Mods-directory scan and descriptor parsing
//! - [`params`]: Persisted per-mod enable/disable state
//! - [`lifecycle`]: The startup coordinator
//! - [`diagnostics`]: The error-event handler built on the core attributor
//! - [`modlog`]: Buffered, file-backed mod log with bounded history
//! - [`snapshot`]: Serializable capture of diagnostics state for offline use
//!
//! # Startup Sequence
//!
//! The [`lifecycle::Coordinator`] runs discovery, registration, dependency
//! resolution, and state application strictly before any mod is activated,
//! single-threaded and to completion. The [`diagnostics::DiagnosticService`]
//! is constructed after startup from state that is never mutated again,
//! which is what makes it safe to call from any thread the host raises
//! error events on.

pub mod config;
pub mod diagnostics;
pub mod discovery;
pub mod lifecycle;
pub mod modlog;
pub mod params;
pub mod snapshot;

pub use config::HostConfig;
pub use diagnostics::{DiagnosticService, Severity};
pub use lifecycle::{ActivationHook, Coordinator, StartupSummary};
pub use modlog::ModLog;
pub use params::ModParams;
pub use snapshot::DiagnosticsSnapshot;
