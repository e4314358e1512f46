//! Identity resolution over the client population.

pub mod fields;
pub mod similarity;

pub use fields::{ClaimedField, ScoringWeights};
pub use similarity::{dates_match, similarity};

use std::collections::BTreeMap;

use serde::Serialize;

use crate::profiles::{ClientDirectory, ClientProfile};

/// Outcome of resolving one set of claimed attributes against the
/// population. Ephemeral; produced fresh per resolution call.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub candidate: ClientProfile,
    pub aggregate_score: f64,
    pub field_scores: BTreeMap<ClaimedField, f64>,
}

/// Weighted fuzzy resolver for noisy extracted identities.
#[derive(Debug, Clone, Default)]
pub struct IdentityResolver {
    weights: ScoringWeights,
}

impl IdentityResolver {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    /// Finds the best-scoring candidate in population order.
    ///
    /// The scan keeps the first candidate whose aggregate score is strictly
    /// greater than the running best (initially zero), so exact ties go to
    /// the earliest candidate and a population where nothing scores above
    /// zero resolves to `None`.
    pub fn resolve(
        &self,
        claimed: &BTreeMap<String, String>,
        directory: &ClientDirectory,
    ) -> Option<MatchResult> {
        let mut best: Option<MatchResult> = None;
        let mut best_score = 0.0;

        for candidate in directory.profiles() {
            let (aggregate_score, field_scores) = self.score_candidate(claimed, candidate);
            if aggregate_score > best_score {
                best_score = aggregate_score;
                best = Some(MatchResult {
                    candidate: candidate.clone(),
                    aggregate_score,
                    field_scores,
                });
            }
        }

        best
    }

    /// Weighted aggregate over the configured field set, counting only
    /// fields present on both sides. No comparable field scores zero.
    fn score_candidate(
        &self,
        claimed: &BTreeMap<String, String>,
        candidate: &ClientProfile,
    ) -> (f64, BTreeMap<ClaimedField, f64>) {
        let mut numerator = 0.0;
        let mut denominator = 0u32;
        let mut field_scores = BTreeMap::new();

        for field in ClaimedField::ALL {
            let Some(weight) = self.weights.weight(field) else {
                continue;
            };
            let Some(claimed_value) = claimed.get(field.claim_key()) else {
                continue;
            };
            let Some(stored_value) = candidate.attribute(field.profile_column()) else {
                continue;
            };

            let score = match field {
                ClaimedField::DateOfBirth => dates_match(claimed_value, stored_value),
                _ => similarity(claimed_value, stored_value),
            };

            numerator += score * f64::from(weight);
            denominator += weight;
            field_scores.insert(field, score);
        }

        if denominator == 0 {
            (0.0, field_scores)
        } else {
            (numerator / f64::from(denominator), field_scores)
        }
    }

    /// Single-best string match for a bare extracted name against a list of
    /// known names. Same strictly-greater, first-wins tie-break as `resolve`.
    pub fn closest_name<'a>(&self, extracted: &str, names: &[&'a str]) -> Option<&'a str> {
        let mut best: Option<&'a str> = None;
        let mut best_score = 0.0;

        for name in names {
            let score = similarity(extracted, name);
            if score > best_score {
                best_score = score;
                best = Some(name);
            }
        }

        best
    }
}
