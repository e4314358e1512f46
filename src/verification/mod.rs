//! End-to-end verification of caller records.
//!
//! `VerificationService` wires the resolver, fact checker, and audit log
//! together: resolve the claimed identity against the client population, ask
//! the oracle whether the claimed facts hold, append one audit row, and
//! return the verdict. Record-level failures are isolated — a record that
//! cannot be verified is marked indeterminate and the batch continues.

pub mod audit;
pub mod facts;
pub mod matching;
pub mod verdict;

pub use audit::{AuditError, AuditLog};
pub use facts::{FactCheckError, FactChecker, SemanticComparator};
pub use matching::{IdentityResolver, MatchResult};
pub use verdict::{BatchVerdict, Verdict, VerdictDetail};

use tracing::{info, warn};

use crate::profiles::ClientDirectory;
use crate::transcripts::TranscriptRecord;

#[derive(Debug)]
pub struct VerificationService {
    resolver: IdentityResolver,
    checker: FactChecker,
    audit: AuditLog,
}

impl VerificationService {
    pub fn new(resolver: IdentityResolver, checker: FactChecker, audit: AuditLog) -> Self {
        Self {
            resolver,
            checker,
            audit,
        }
    }

    /// Verifies one transcript record and appends its audit row.
    pub fn verify_record(
        &self,
        record: &TranscriptRecord,
        directory: &ClientDirectory,
    ) -> Verdict {
        let verdict = self.derive_verdict(record, directory);
        if let Err(err) = self.audit.record(&verdict) {
            // The verdict still stands; only the trail entry is lost.
            warn!(record_id = %verdict.record_id, %err, "failed to append audit row");
        }
        verdict
    }

    /// Verifies a batch in order and aggregates the outcomes.
    pub fn verify_batch(
        &self,
        records: &[TranscriptRecord],
        directory: &ClientDirectory,
    ) -> BatchVerdict {
        let verdicts = records
            .iter()
            .map(|record| self.verify_record(record, directory))
            .collect();
        let batch = BatchVerdict::aggregate(verdicts);
        info!(
            records = batch.verdicts.len(),
            overall_passed = batch.overall_passed,
            "verification batch complete"
        );
        batch
    }

    fn derive_verdict(&self, record: &TranscriptRecord, directory: &ClientDirectory) -> Verdict {
        let Some(matched) = self.resolver.resolve(&record.claimed, directory) else {
            warn!(record_id = %record.record_id, "no client record resolved for claimed identity");
            return Verdict::indeterminate(
                record.record_id.as_str(),
                "no client record resolved for claimed identity",
            );
        };

        match self.checker.check(record, &matched.candidate) {
            Ok(passed) => Verdict::checked(
                record.record_id.as_str(),
                passed,
                VerdictDetail::FactsChecked {
                    matched_profile: matched.candidate.name.clone(),
                    aggregate_score: matched.aggregate_score,
                },
            ),
            Err(FactCheckError::EmptyTranscript { record_id }) => {
                warn!(%record_id, "transcript has no translated text");
                Verdict::indeterminate(
                    record.record_id.as_str(),
                    "transcript has no translated text",
                )
            }
            Err(FactCheckError::Oracle(err)) => {
                warn!(record_id = %record.record_id, %err, "oracle comparison failed");
                Verdict::indeterminate(
                    record.record_id.as_str(),
                    format!("oracle comparison failed: {err}"),
                )
            }
        }
    }
}
