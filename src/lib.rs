//! Caller identity resolution and fact verification.
//!
//! Given a call transcript with caller-claimed attributes extracted upstream,
//! this crate resolves the caller to a stored client profile via weighted
//! fuzzy multi-field scoring, asks an external semantic-comparison oracle
//! whether the claimed facts match the stored record, and aggregates the
//! per-record outcomes into an append-only audit trail and a batch verdict.
//!
//! Audio handling, transcription, translation, and attribute extraction are
//! upstream concerns; this crate consumes their outputs.

pub mod config;
pub mod pipeline;
pub mod profiles;
pub mod transcripts;
pub mod verification;
