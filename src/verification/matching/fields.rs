use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Claimed attributes that participate in identity scoring. Each one knows
/// the key the extraction step uses and the client-population column it is
/// checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClaimedField {
    Name,
    Degree,
    DateOfBirth,
    Id,
}

impl ClaimedField {
    pub const ALL: [ClaimedField; 4] = [
        ClaimedField::Name,
        ClaimedField::Degree,
        ClaimedField::DateOfBirth,
        ClaimedField::Id,
    ];

    /// Key used in the extracted claimed-attribute map.
    pub fn claim_key(&self) -> &'static str {
        match self {
            ClaimedField::Name => "Name",
            ClaimedField::Degree => "Degree",
            ClaimedField::DateOfBirth => "Date of Birth",
            ClaimedField::Id => "ID",
        }
    }

    /// Column the claim is compared against in the client population.
    pub fn profile_column(&self) -> &'static str {
        match self {
            ClaimedField::Name => "name",
            ClaimedField::Degree => "highest_previous_education",
            ClaimedField::DateOfBirth => "birthday",
            ClaimedField::Id => "account_nr",
        }
    }
}

/// Weight table for identity scoring. Fields without a weight are ignored
/// entirely rather than defaulted, so an unweighted attribute can never skew
/// the denominator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringWeights {
    weights: BTreeMap<ClaimedField, u32>,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        let mut weights = BTreeMap::new();
        weights.insert(ClaimedField::Name, 3);
        weights.insert(ClaimedField::Degree, 2);
        weights.insert(ClaimedField::DateOfBirth, 2);
        weights.insert(ClaimedField::Id, 1);
        Self { weights }
    }
}

impl ScoringWeights {
    pub fn new(weights: BTreeMap<ClaimedField, u32>) -> Self {
        Self { weights }
    }

    pub fn weight(&self, field: ClaimedField) -> Option<u32> {
        self.weights.get(&field).copied()
    }
}
