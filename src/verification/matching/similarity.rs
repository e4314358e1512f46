//! Scalar field similarity.
//!
//! Every score in this module lies in `[0, 100]`. Malformed input never
//! propagates an error; it scores zero and leaves a diagnostic.

use chrono::NaiveDate;
use tracing::warn;

/// Format callers use when stating a birth date ("15th of May 1990").
const CLAIMED_DATE_FORMAT: &str = "%dth of %B %Y";
/// Format the client population stores dates in.
const STORED_DATE_FORMAT: &str = "%Y-%m-%d";

/// Case-insensitive edit-distance similarity between two strings, scaled to
/// `[0, 100]`. Symmetric, and exactly 100 for identical input.
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase()) * 100.0
}

/// Calendar equality between a claimed date and a stored ISO date.
///
/// Returns exactly 100.0 when both parse and name the same day, otherwise
/// 0.0. No partial credit for near dates; a parse failure is a recoverable
/// event, logged and scored zero.
pub fn dates_match(claimed: &str, stored: &str) -> f64 {
    let claimed_date = match NaiveDate::parse_from_str(claimed.trim(), CLAIMED_DATE_FORMAT) {
        Ok(date) => date,
        Err(err) => {
            warn!(value = claimed, %err, "claimed date did not parse");
            return 0.0;
        }
    };

    let stored_date = match NaiveDate::parse_from_str(stored.trim(), STORED_DATE_FORMAT) {
        Ok(date) => date,
        Err(err) => {
            warn!(value = stored, %err, "stored date did not parse");
            return 0.0;
        }
    };

    if claimed_date == stored_date {
        100.0
    } else {
        0.0
    }
}
