//! Parser for the oracle's concluding verdict line.
//!
//! The oracle ends its free-text analysis with a machine-parsable marker.
//! Accepted grammar for the final non-empty line, case-insensitive and
//! whitespace-trimmed:
//!
//! ```text
//! verdict      = [ prefix ": " ] marker
//! marker       = "output=true" | "output=false" | "true" | "false"
//! ```
//!
//! Anything else fails closed: the verdict is treated as `false`, never as a
//! pass and never as an error.

use tracing::warn;

/// Extracts the boolean verdict from a full oracle response.
pub fn parse_verdict(response: &str) -> bool {
    let Some(final_line) = response.lines().rev().find(|line| !line.trim().is_empty()) else {
        warn!("oracle response was empty; failing closed");
        return false;
    };

    let marker = final_line
        .rsplit(": ")
        .next()
        .unwrap_or(final_line)
        .trim()
        .to_lowercase();

    match marker.as_str() {
        "output=true" | "true" => true,
        "output=false" | "false" => false,
        other => {
            warn!(marker = other, "oracle verdict line did not parse; failing closed");
            false
        }
    }
}
