//! Core Data Model and Algorithms for the Mod Framework
//!
//! This crate contains the pieces of the mod-management framework that do
//! real algorithmic work: the dependency resolver that fixes activation
//! order, and the crash attributor that correlates runtime error text with
//! the mods that most likely produced it.
//!
//! # Overview
//!
//! The crate is organized into several key modules:
//!
//! - [`descriptor`]: Static mod metadata parsed from descriptor files
//! - [`registry`]: Insertion-ordered registry of discovered mods
//! - [`resolver`]: Topological activation ordering over soft requirements
//! - [`type_index`]: Per-mod cache of fully-qualified type names
//! - [`patch`]: Interceptor metadata and the method lookup table
//! - [`attribution`]: Best-effort crash attribution over error text
//! - [`report`]: Human-readable rendering of attribution results
//! - [`error`]: Typed errors for the core
//!
//! Everything here is I/O-free; directory scanning, activation, and log
//! handling live in `modforge-runtime`.
//!
//! # Threading Model
//!
//! Startup (registration, index construction, resolution) is single-threaded.
//! Once startup completes, nothing in this crate is mutated; the attributor
//! performs reads only and may be invoked concurrently from any thread.

pub mod attribution;
pub mod descriptor;
pub mod error;
pub mod patch;
pub mod registry;
pub mod report;
pub mod resolver;
pub mod type_index;

pub use attribution::{Attribution, Attributor, Suspect};
pub use descriptor::{ModDescriptor, ModVersion};
pub use error::CoreError;
pub use patch::{MethodTable, PatchKind, PatchRecord, PatchRegistry, StaticPatchRegistry};
pub use registry::{ModEntry, ModRegistry};
pub use resolver::resolve;
pub use type_index::{TypeEnumerator, TypeIndex};
