//! Fact comparison between a transcript and a resolved client profile.

pub mod oracle;
mod verdict_line;

pub use oracle::{ChatCompletionClient, OracleError, SemanticComparator};
pub use verdict_line::parse_verdict;

use crate::profiles::ClientProfile;
use crate::transcripts::TranscriptRecord;

/// Fixed directive handed to the oracle with every comparison. The final
/// rule matters most: the response must close with the machine-parsable
/// verdict line consumed by [`parse_verdict`].
const COMPARISON_INSTRUCTION: &str = "\
Analyze the call transcript by comparing each statement to the provided client data. \
Follow these rules:\n\
1. Only consider statements that correspond to columns in the client data.\n\
2. For each relevant statement, check if it MATCHES or DOES NOT MATCH the client data.\n\
3. Ignore any statements about urgency, confidentiality, or requests for actions.\n\
4. Do not mark anything as UNVERIFIABLE. Only consider data present in both the transcript and client data.\n\
5. After analysis, conclude with 'output=true' if ALL checked statements match, or 'output=false' if ANY statement does not match.\n\
6. Present your analysis as a list of comparisons, followed by the output.";

#[derive(Debug, thiserror::Error)]
pub enum FactCheckError {
    /// The transcript carries no translated text, so there is nothing to
    /// compare. Insufficient data, not a crash.
    #[error("transcript {record_id} has no translated text")]
    EmptyTranscript { record_id: String },
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

/// Asks the oracle whether a transcript's claims match a stored profile.
#[derive(Debug)]
pub struct FactChecker {
    oracle: Box<dyn SemanticComparator>,
}

impl FactChecker {
    pub fn new(oracle: Box<dyn SemanticComparator>) -> Self {
        Self { oracle }
    }

    /// Returns `true` when every checked statement in the transcript matches
    /// the profile. Unparseable oracle output fails closed to `false`;
    /// transport failures surface as [`FactCheckError::Oracle`] so the
    /// caller can mark the record indeterminate instead of failed.
    pub fn check(
        &self,
        record: &TranscriptRecord,
        profile: &ClientProfile,
    ) -> Result<bool, FactCheckError> {
        if record.translated_text.trim().is_empty() {
            return Err(FactCheckError::EmptyTranscript {
                record_id: record.record_id.clone(),
            });
        }

        let payload = format!(
            "transcript: {}\n\ndata: {}",
            record.translated_text,
            profile.serialize_attributes()
        );

        let response = self.oracle.compare(COMPARISON_INSTRUCTION, &payload)?;
        Ok(parse_verdict(&response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::ClientDirectory;
    use std::collections::BTreeMap;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    /// Records what it was asked and replies from a script.
    #[derive(Debug)]
    struct ScriptedOracle {
        responses: Mutex<Vec<Result<String, OracleError>>>,
        seen_payloads: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedOracle {
        fn replying(responses: Vec<Result<String, OracleError>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                seen_payloads: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn payload_log(&self) -> Arc<Mutex<Vec<String>>> {
            Arc::clone(&self.seen_payloads)
        }
    }

    impl SemanticComparator for ScriptedOracle {
        fn compare(&self, _instruction: &str, payload: &str) -> Result<String, OracleError> {
            self.seen_payloads
                .lock()
                .expect("payload mutex poisoned")
                .push(payload.to_string());
            self.responses
                .lock()
                .expect("response mutex poisoned")
                .remove(0)
        }
    }

    fn profile() -> ClientProfile {
        let directory = ClientDirectory::from_reader(Cursor::new(
            "name,birthday\nJorge Castillo,1990-05-15\n",
        ))
        .expect("population loads");
        directory.profiles()[0].clone()
    }

    fn record(text: &str) -> TranscriptRecord {
        TranscriptRecord {
            record_id: "clip-0042".to_string(),
            translated_text: text.to_string(),
            claimed: BTreeMap::new(),
        }
    }

    #[test]
    fn payload_carries_transcript_and_serialized_profile() {
        let oracle = ScriptedOracle::replying(vec![Ok("Conclusion: output=true".to_string())]);
        let payloads = oracle.payload_log();
        let checker = FactChecker::new(Box::new(oracle));

        let matched = checker
            .check(&record("I was born on the 15th of May 1990."), &profile())
            .expect("comparison succeeds");
        assert!(matched);

        let payloads = payloads.lock().expect("payload mutex poisoned");
        assert_eq!(payloads.len(), 1);
        assert!(payloads[0].starts_with("transcript: I was born"));
        assert!(payloads[0].contains("\n\ndata: name: Jorge Castillo, birthday: 1990-05-15"));
    }

    #[test]
    fn multi_line_analysis_uses_only_the_conclusion() {
        let response = "1. Name: MATCHES\n2. Birthday: DOES NOT MATCH\nConclusion: output=false";
        let oracle = ScriptedOracle::replying(vec![Ok(response.to_string())]);
        let checker = FactChecker::new(Box::new(oracle));

        let matched = checker
            .check(&record("My birthday is in June."), &profile())
            .expect("comparison succeeds");
        assert!(!matched);
    }

    #[test]
    fn unclear_conclusion_fails_closed() {
        let oracle = ScriptedOracle::replying(vec![Ok("Result: unclear".to_string())]);
        let checker = FactChecker::new(Box::new(oracle));

        let matched = checker
            .check(&record("Hello."), &profile())
            .expect("comparison succeeds");
        assert!(!matched);
    }

    #[test]
    fn empty_transcript_is_insufficient_data() {
        let oracle = ScriptedOracle::replying(vec![]);
        let checker = FactChecker::new(Box::new(oracle));

        let error = checker
            .check(&record("   "), &profile())
            .expect_err("empty transcript cannot be checked");
        assert!(matches!(error, FactCheckError::EmptyTranscript { .. }));
    }

    #[test]
    fn oracle_failure_surfaces_as_error() {
        let oracle = ScriptedOracle::replying(vec![Err(OracleError::Transport(
            "connection reset".to_string(),
        ))]);
        let checker = FactChecker::new(Box::new(oracle));

        let error = checker
            .check(&record("Hello."), &profile())
            .expect_err("transport failure propagates");
        assert!(matches!(error, FactCheckError::Oracle(_)));
    }
}
