//! Attribution Reports
//!
//! Renders an [`Attribution`] as the multi-line text block the framework
//! writes to the mod log. Two shapes exist: the suspect list for a
//! completed pass, and a fixed-format failure block, aimed at a framework
//! maintainer rather than an end user, for a pass that faulted internally.

use crate::attribution::Attribution;
use std::fmt::Write;

/// Render an attribution outcome, or `None` when the pass completed and
/// found no suspect (nothing worth writing to the log).
pub fn render_report(attribution: &Attribution) -> Option<String> {
    if !attribution.success {
        return Some(render_failure(attribution));
    }
    if attribution.suspects.is_empty() {
        return None;
    }
    Some(render_suspects(attribution))
}

fn render_suspects(attribution: &Attribution) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Found {} mod(s) that may have caused this error:",
        attribution.suspects.len()
    );
    for (number, suspect) in attribution.suspects.iter().enumerate() {
        let descriptor = &suspect.descriptor;
        let _ = writeln!(out, "---------- suspect {} ----------", number + 1);
        let _ = writeln!(out, "Name: {}", descriptor.display_name());
        let _ = writeln!(out, "Id: {}", descriptor.id);
        let _ = writeln!(out, "Author: {}", descriptor.author.as_deref().unwrap_or("unknown"));
        let _ = writeln!(out, "Version: {}", descriptor.version.as_deref().unwrap_or("unknown"));
        let _ = writeln!(out, "Mod identifiers found in the error text:");
        for line in &suspect.evidence {
            let _ = writeln!(out, "  {}", line);
        }
        let _ = writeln!(
            out,
            "Consider reporting the full error to the mod author, or disabling this mod."
        );
    }
    out
}

fn render_failure(attribution: &Attribution) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "The mod diagnostics helper hit an internal error and could not examine this error event."
    );
    let _ = writeln!(out, "Fault details:");
    for suspect in &attribution.suspects {
        for line in &suspect.evidence {
            let _ = writeln!(out, "  {}", line);
        }
    }
    let _ = writeln!(
        out,
        "Please report the details above to the mod framework maintainers."
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribution::Suspect;
    use crate::descriptor::ModDescriptor;

    #[test]
    fn test_no_suspects_renders_nothing() {
        let attribution = Attribution { success: true, suspects: Vec::new() };
        assert!(render_report(&attribution).is_none());
    }

    #[test]
    fn test_suspect_block_contains_identity_and_evidence() {
        let mut descriptor = ModDescriptor::new("mymod");
        descriptor.display_name = Some("My Mod".to_string());
        descriptor.author = Some("someone".to_string());
        descriptor.version = Some("1.2.0".to_string());
        let attribution = Attribution {
            success: true,
            suspects: vec![Suspect {
                descriptor,
                evidence: vec!["Acme.Engine.Controller".to_string()],
            }],
        };

        let report = render_report(&attribution).unwrap();
        assert!(report.contains("Found 1 mod(s)"));
        assert!(report.contains("Name: My Mod"));
        assert!(report.contains("Id: mymod"));
        assert!(report.contains("Author: someone"));
        assert!(report.contains("Version: 1.2.0"));
        assert!(report.contains("  Acme.Engine.Controller"));
    }

    #[test]
    fn test_failure_block_is_rendered_for_unsuccessful_pass() {
        let attribution = Attribution {
            success: false,
            suspects: vec![Suspect {
                descriptor: ModDescriptor::new("modforge.diagnostics"),
                evidence: vec!["registry corrupted".to_string(), "patch registry query".to_string()],
            }],
        };

        let report = render_report(&attribution).unwrap();
        assert!(report.contains("internal error"));
        assert!(report.contains("  registry corrupted"));
        assert!(!report.contains("suspect 1"));
    }
}
