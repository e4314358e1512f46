//! Transcript record input.
//!
//! Upstream transcription and extraction produce one JSON document per call:
//! the transcriber writes the normalized transcript under
//! `result.translated_text`, and the extraction step patches in a `context`
//! object holding the caller-claimed attributes keyed by claim name
//! (`Name`, `Date of Birth`, `Degree`, `ID`, ...). This module reads that
//! shape into the crate's input type.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

/// One call transcript plus the attributes the caller claimed during it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptRecord {
    pub record_id: String,
    pub translated_text: String,
    pub claimed: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    #[error("failed to read transcript: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse transcript JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct TranscriptDocument {
    #[serde(default)]
    result: TranscriptResult,
    #[serde(default)]
    context: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct TranscriptResult {
    #[serde(default)]
    translated_text: String,
}

impl TranscriptRecord {
    /// Reads a transcript document from disk. The record id is taken from the
    /// file stem, matching how the upstream pipeline names its outputs.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TranscriptError> {
        let path = path.as_ref();
        let record_id = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file = std::fs::File::open(path)?;
        Self::from_reader(record_id, file)
    }

    pub fn from_reader<R: Read>(
        record_id: impl Into<String>,
        reader: R,
    ) -> Result<Self, TranscriptError> {
        let document: TranscriptDocument = serde_json::from_reader(reader)?;
        Ok(Self::from_document(record_id.into(), document))
    }

    fn from_document(record_id: String, document: TranscriptDocument) -> Self {
        // The extraction step stores the document id under `context.ID`; it
        // identifies the record rather than a caller claim, so it falls back
        // into `record_id` when the caller supplied none.
        let mut document_id = None;
        let claimed = document
            .context
            .into_iter()
            .filter_map(|(key, value)| {
                let value = match value {
                    serde_json::Value::String(text) => text,
                    serde_json::Value::Number(number) => number.to_string(),
                    serde_json::Value::Bool(flag) => flag.to_string(),
                    _ => return None,
                };
                if key.eq_ignore_ascii_case("id") {
                    document_id = Some(value);
                    return None;
                }
                Some((key, value))
            })
            .filter(|(_, value)| !value.trim().is_empty())
            .collect();

        let record_id = if record_id.trim().is_empty() {
            document_id.unwrap_or(record_id)
        } else {
            record_id
        };

        Self {
            record_id,
            translated_text: document.result.translated_text,
            claimed,
        }
    }
}
