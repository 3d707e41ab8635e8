//! Mod Descriptors
//!
//! Static metadata for a single mod, parsed once from the descriptor file
//! that ships next to the mod's code unit. Descriptors are immutable after
//! creation; everything mutable about a mod at runtime lives on
//! [`crate::registry::ModEntry`].
//!
//! Descriptor files may be JSON or TOML. Fields other than `id` are
//! optional so that minimal descriptors stay valid:
//!
//! ```json
//! {
//!   "id": "example_mod",
//!   "display_name": "Example Mod",
//!   "author": "Someone",
//!   "version": "1.2.0",
//!   "requirements": { "base_mod": "1.0.0", "other_mod": null }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Static metadata for one mod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModDescriptor {
    /// Unique mod identifier
    pub id: String,
    /// Name shown to the user (falls back to `id` when absent)
    #[serde(default)]
    pub display_name: Option<String>,
    /// Mod author
    #[serde(default)]
    pub author: Option<String>,
    /// Mod version string
    #[serde(default)]
    pub version: Option<String>,
    /// Minimum manager version the mod was built against
    #[serde(default)]
    pub manager_version: Option<String>,
    /// Game version the mod targets
    #[serde(default)]
    pub game_version: Option<String>,
    /// Required mod ids, each with an optional minimum version
    #[serde(default)]
    pub requirements: BTreeMap<String, Option<String>>,
    /// File name of the mod's code unit (defaults to `<id>.dll`)
    #[serde(default)]
    pub assembly_name: Option<String>,
    /// Entry method invoked on activation, `Namespace.Type.Method` form
    #[serde(default)]
    pub entry_method: Option<String>,
    /// Home page URL
    #[serde(default)]
    pub home_page: Option<String>,
    /// Update repository URL
    #[serde(default)]
    pub repository: Option<String>,
}

impl ModDescriptor {
    /// Create a descriptor with only an id set.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            author: None,
            version: None,
            manager_version: None,
            game_version: None,
            requirements: BTreeMap::new(),
            assembly_name: None,
            entry_method: None,
            home_page: None,
            repository: None,
        }
    }

    /// Parse a descriptor from file contents, choosing the format by
    /// extension (TOML for `.toml`, JSON otherwise).
    pub fn from_file_contents(path: &Path, content: &str) -> anyhow::Result<Self> {
        let mut descriptor: ModDescriptor =
            if path.extension().and_then(|e| e.to_str()) == Some("toml") {
                toml::from_str(content)?
            } else {
                serde_json::from_str(content)?
            };
        descriptor.normalize();
        Ok(descriptor)
    }

    /// Fill in derivable defaults. Currently only the code unit file name,
    /// which defaults to `<id>.dll` when the descriptor leaves it out.
    pub fn normalize(&mut self) {
        if self.assembly_name.as_deref().map_or(true, str::is_empty) && !self.id.is_empty() {
            self.assembly_name = Some(format!("{}.dll", self.id));
        }
    }

    /// Name shown in reports and logs.
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }

    /// Parsed mod version, if the descriptor carries one.
    pub fn parsed_version(&self) -> Option<ModVersion> {
        self.version.as_deref().map(ModVersion::parse)
    }
}

/// A comparable mod version.
///
/// Mod descriptors in the wild carry anything from clean semver to
/// four-part `0.21.4.0` strings. Well-formed semver is parsed strictly;
/// everything else falls back to reading leading numeric components, so
/// `1.2` becomes `1.2.0` and `0.21.4.0` becomes `0.21.4`. Comparison only
/// looks at the major/minor/patch triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ModVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl ModVersion {
    pub const ZERO: ModVersion = ModVersion { major: 0, minor: 0, patch: 0 };

    /// Parse a version string leniently. Never fails; unreadable input
    /// parses as `0.0.0`.
    pub fn parse(s: &str) -> Self {
        if let Ok(v) = semver::Version::parse(s.trim()) {
            return Self { major: v.major, minor: v.minor, patch: v.patch };
        }

        let mut parts = s.trim().split('.').map(|p| {
            let digits: String = p.chars().take_while(char::is_ascii_digit).collect();
            digits.parse::<u64>().unwrap_or(0)
        });
        Self {
            major: parts.next().unwrap_or(0),
            minor: parts.next().unwrap_or(0),
            patch: parts.next().unwrap_or(0),
        }
    }
}

impl fmt::Display for ModVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
