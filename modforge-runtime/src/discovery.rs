//! Mod Discovery
//!
//! Scans the mods directory one level deep: every subdirectory that
//! carries a descriptor file is a mod candidate. A descriptor that fails
//! to parse is logged and skipped; discovery itself only fails when the
//! directory cannot be read at all.

use anyhow::Result;
use modforge_core::ModDescriptor;
use std::path::{Path, PathBuf};

/// Outcome of one directory scan.
#[derive(Debug, Default)]
pub struct Discovered {
    /// Successfully parsed descriptors, in directory iteration order
    pub descriptors: Vec<ModDescriptor>,
    /// Subdirectories that carried a descriptor file, parseable or not.
    /// The startup summary reports activated mods against this count.
    pub candidates: usize,
}

/// Scan `mods_dir` for mod descriptors named `descriptor_file`.
///
/// The file name lookup is case-tolerant: `Info.json` falls back to
/// `info.json`, matching what mod authors actually ship.
pub fn scan(mods_dir: &Path, descriptor_file: &str) -> Result<Discovered> {
    let mut discovered = Discovered::default();

    if !mods_dir.is_dir() {
        log::warn!("Mods directory does not exist: {}", mods_dir.display());
        return Ok(discovered);
    }

    for entry in std::fs::read_dir(mods_dir)? {
        let entry = entry?;
        let dir = entry.path();
        if !dir.is_dir() {
            continue;
        }

        let Some(descriptor_path) = find_descriptor(&dir, descriptor_file) else {
            continue;
        };
        discovered.candidates += 1;
        log::info!("Reading descriptor '{}'.", descriptor_path.display());

        match read_descriptor(&descriptor_path) {
            Ok(descriptor) => discovered.descriptors.push(descriptor),
            Err(e) => {
                log::error!(
                    "Error parsing descriptor '{}': {:#}",
                    descriptor_path.display(),
                    e
                );
            }
        }
    }

    Ok(discovered)
}

fn find_descriptor(dir: &Path, descriptor_file: &str) -> Option<PathBuf> {
    let exact = dir.join(descriptor_file);
    if exact.is_file() {
        return Some(exact);
    }
    let lower = dir.join(descriptor_file.to_lowercase());
    if lower.is_file() {
        return Some(lower);
    }
    None
}

fn read_descriptor(path: &Path) -> Result<ModDescriptor> {
    let content = std::fs::read_to_string(path)?;
    ModDescriptor::from_file_contents(path, &content)
}
