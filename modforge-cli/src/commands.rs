//! Subcommand implementations.

use anyhow::{bail, Context, Result};
use modforge_core::report::render_report;
use modforge_core::{resolve, ModRegistry};
use modforge_runtime::{discovery, DiagnosticsSnapshot};
use std::path::Path;

/// Scan a mods directory and print every mod with its validation state.
pub fn list_mods(mods_dir: &Path, descriptor_file: &str) -> Result<()> {
    let discovered = discovery::scan(mods_dir, descriptor_file)
        .with_context(|| format!("Failed to scan '{}'", mods_dir.display()))?;

    if discovered.candidates == 0 {
        println!("No mods found in '{}'.", mods_dir.display());
        return Ok(());
    }

    let mut registry = ModRegistry::new();
    let mut rejected = Vec::new();
    for descriptor in discovered.descriptors {
        let id = descriptor.id.clone();
        if let Err(e) = registry.register(descriptor) {
            rejected.push(format!("{} ({})", id, e));
        }
    }

    println!(
        "{} mod(s) found, {} with a readable descriptor:",
        discovered.candidates,
        registry.len() + rejected.len()
    );
    for entry in registry.entries() {
        let descriptor = &entry.descriptor;
        let missing: Vec<&str> = descriptor
            .requirements
            .keys()
            .map(String::as_str)
            .filter(|req| !registry.contains(req))
            .collect();
        let note = if missing.is_empty() {
            String::new()
        } else {
            format!("  [missing requirements: {}]", missing.join(", "))
        };
        println!(
            "  {}  {}  by {}{}",
            descriptor.id,
            descriptor.version.as_deref().unwrap_or("-"),
            descriptor.author.as_deref().unwrap_or("unknown"),
            note
        );
    }
    for line in &rejected {
        println!("  rejected: {}", line);
    }
    Ok(())
}

/// Print the activation order the framework would use.
pub fn print_order(mods_dir: &Path, descriptor_file: &str) -> Result<()> {
    let discovered = discovery::scan(mods_dir, descriptor_file)
        .with_context(|| format!("Failed to scan '{}'", mods_dir.display()))?;

    let mut registry = ModRegistry::new();
    for descriptor in discovered.descriptors {
        let id = descriptor.id.clone();
        if let Err(e) = registry.register(descriptor) {
            log::warn!("Skipping '{}': {}.", id, e);
        }
    }

    let order = resolve(&registry).context("Cannot order mods")?;
    for (position, id) in order.iter().enumerate() {
        println!("{:3}. {}", position + 1, id);
    }
    Ok(())
}

/// Attribute an error text against an exported diagnostics snapshot.
pub fn attribute(snapshot_path: &Path, message: &str, stack: &str) -> Result<()> {
    if message.is_empty() && stack.is_empty() {
        bail!("nothing to attribute: pass --log-file or --message");
    }

    let service = DiagnosticsSnapshot::load(snapshot_path)?.into_service();
    let attribution = service.attribute(message, stack);

    match render_report(&attribution) {
        Some(report) => print!("{}", report),
        None => println!("No mod identifiers found in the given text."),
    }
    Ok(())
}
