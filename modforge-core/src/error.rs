//! Error Types for the Core
//!
//! This module provides the typed errors for registration, dependency
//! resolution, and crash attribution using `thiserror`.
//!
//! Per-mod failures (duplicate id, unreadable descriptor, unindexable code
//! unit) are always recovered locally by the caller: the offending mod is
//! skipped and processing continues. Only two conditions are surfaced as
//! hard errors: a requirement cycle, which makes activation order
//! undefined, and an internal fault inside an attribution pass, which
//! invalidates the whole pass.

use thiserror::Error;

/// Core error types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A second descriptor was registered under an id that is already taken.
    #[error("mod id '{id}' is already used by another mod")]
    DuplicateModId { id: String },

    /// A descriptor arrived without an id.
    #[error("mod descriptor has no id")]
    MissingModId,

    /// The requirement graph over present mods contains a cycle.
    ///
    /// `cycle` lists the ids on the detected cycle in traversal order,
    /// starting and ending at the same mod.
    #[error("mod requirements form a cycle: {}", cycle.join(" -> "))]
    DependencyCycle { cycle: Vec<String> },
}

/// Fault raised when an attribution pass cannot be trusted to completion.
///
/// Carries a human-readable description and the location inside the
/// attributor that raised it, for the maintainer-facing failure report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} (at {location})")]
pub struct AttributionFault {
    pub message: String,
    pub location: &'static str,
}

impl AttributionFault {
    pub fn new(message: impl Into<String>, location: &'static str) -> Self {
        Self { message: message.into(), location }
    }
}

/// Error returned by a patch-metadata query.
///
/// Distinct from a lookup miss: a miss means nothing is installed on the
/// method and is not an error at all, while this type signals that the
/// registry itself could not answer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("patch registry query failed for {target_type}.{target_method}: {message}")]
pub struct PatchQueryError {
    pub target_type: String,
    pub target_method: String,
    pub message: String,
}
