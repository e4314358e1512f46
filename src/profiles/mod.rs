//! Client population loading and lookup.
//!
//! The population is a CSV table with a required `name` column and arbitrary
//! additional attribute columns (birthday, account number, tax residency,
//! and so on). It is loaded once per pipeline run and treated as read-only
//! for the run's duration.

use std::io::Read;
use std::path::Path;

use serde::Serialize;

/// One stored client record. `name` is the case-insensitive match key;
/// `attributes` keeps every column (including `name`) in file order so the
/// record can be serialized back out for the comparison oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientProfile {
    pub name: String,
    pub attributes: Vec<(String, String)>,
}

impl ClientProfile {
    /// Value of a single attribute column, if present.
    pub fn attribute(&self, column: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == column)
            .map(|(_, value)| value.as_str())
    }

    /// Flat `key: value, key: value` listing over every column, in file
    /// order. This is the exact payload shape the oracle contract expects.
    pub fn serialize_attributes(&self) -> String {
        self.attributes
            .iter()
            .map(|(key, value)| format!("{}: {}", key, value))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// The loaded client population, in source order. Owned by the pipeline run
/// and passed explicitly into resolution and fact-checking calls.
#[derive(Debug, Clone)]
pub struct ClientDirectory {
    profiles: Vec<ClientProfile>,
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileStoreError {
    #[error("failed to read client population: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid client population CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("client population is missing a 'name' column")]
    MissingNameColumn,
}

impl ClientDirectory {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ProfileStoreError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ProfileStoreError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let name_index = headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case("name"))
            .ok_or(ProfileStoreError::MissingNameColumn)?;

        let mut profiles = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let name = record
                .get(name_index)
                .unwrap_or_default()
                .trim()
                .to_string();
            let attributes = headers
                .iter()
                .zip(record.iter())
                .map(|(header, value)| (header.to_string(), value.to_string()))
                .collect();
            profiles.push(ClientProfile { name, attributes });
        }

        Ok(Self { profiles })
    }

    /// Exact lookup by name, case-insensitive and whitespace-trimmed.
    pub fn find_by_name(&self, full_name: &str) -> Option<&ClientProfile> {
        let needle = full_name.trim();
        self.profiles
            .iter()
            .find(|profile| profile.name.eq_ignore_ascii_case(needle))
    }

    /// All stored names, in source order.
    pub fn names(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn profiles(&self) -> &[ClientProfile] {
        &self.profiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const POPULATION: &str = "\
name,birthday,highest_previous_education,account_nr,tax_residency
Jorge Castillo,1990-05-15,Master of Finance,CH-4402-8821,Switzerland
Amelie Dupont,1985-11-02,Bachelor of Law,CH-1180-0347,France
";

    #[test]
    fn loads_profiles_with_all_columns() {
        let directory =
            ClientDirectory::from_reader(Cursor::new(POPULATION)).expect("population loads");
        assert_eq!(directory.profiles().len(), 2);

        let jorge = &directory.profiles()[0];
        assert_eq!(jorge.name, "Jorge Castillo");
        assert_eq!(jorge.attribute("birthday"), Some("1990-05-15"));
        assert_eq!(jorge.attribute("account_nr"), Some("CH-4402-8821"));
    }

    #[test]
    fn find_by_name_ignores_case_and_whitespace() {
        let directory =
            ClientDirectory::from_reader(Cursor::new(POPULATION)).expect("population loads");
        let profile = directory
            .find_by_name("  jorge castillo ")
            .expect("lookup succeeds");
        assert_eq!(profile.name, "Jorge Castillo");
        assert!(directory.find_by_name("Nobody Known").is_none());
    }

    #[test]
    fn serialize_attributes_preserves_column_order() {
        let directory =
            ClientDirectory::from_reader(Cursor::new(POPULATION)).expect("population loads");
        let serialized = directory.profiles()[1].serialize_attributes();
        assert_eq!(
            serialized,
            "name: Amelie Dupont, birthday: 1985-11-02, \
             highest_previous_education: Bachelor of Law, \
             account_nr: CH-1180-0347, tax_residency: France"
        );
    }

    #[test]
    fn missing_name_column_is_a_load_error() {
        let csv = "full_name,birthday\nJorge Castillo,1990-05-15\n";
        let error = ClientDirectory::from_reader(Cursor::new(csv))
            .expect_err("load should fail without a name column");
        assert!(matches!(error, ProfileStoreError::MissingNameColumn));
    }
}
