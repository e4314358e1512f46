//! Per-record and batch verdicts.
//!
//! Polarity, fixed across the whole crate: `passed == true` means the
//! claimed facts matched the stored profile. A record that could not be
//! verified at all is indeterminate — it reports `passed == false` (never a
//! silent pass) and keeps the reason in its detail.

use serde::Serialize;

/// Append-only outcome for one transcript record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub record_id: String,
    pub passed: bool,
    pub detail: Option<VerdictDetail>,
}

/// Structured breakdown behind a verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum VerdictDetail {
    /// Facts were compared against this profile.
    FactsChecked {
        matched_profile: String,
        aggregate_score: f64,
    },
    /// The record could not be verified; the reason is operator-facing.
    Indeterminate { reason: String },
}

impl Verdict {
    pub fn checked(record_id: impl Into<String>, passed: bool, detail: VerdictDetail) -> Self {
        Self {
            record_id: record_id.into(),
            passed,
            detail: Some(detail),
        }
    }

    pub fn indeterminate(record_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            record_id: record_id.into(),
            passed: false,
            detail: Some(VerdictDetail::Indeterminate {
                reason: reason.into(),
            }),
        }
    }

    pub fn is_indeterminate(&self) -> bool {
        matches!(self.detail, Some(VerdictDetail::Indeterminate { .. }))
    }
}

/// Aggregate over a batch of verdicts.
#[derive(Debug, Clone, Serialize)]
pub struct BatchVerdict {
    pub verdicts: Vec<Verdict>,
    pub overall_passed: bool,
}

impl BatchVerdict {
    /// `overall_passed` is the conjunction of every per-record flag. An
    /// empty batch passes vacuously.
    pub fn aggregate(verdicts: Vec<Verdict>) -> Self {
        let overall_passed = verdicts.iter().all(|verdict| verdict.passed);
        Self {
            verdicts,
            overall_passed,
        }
    }
}
