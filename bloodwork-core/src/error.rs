//! Error types surfaced at the core boundary.
//!
//! Parsing and rule application never fail; everything here is environmental
//! (unreadable input, bad configuration, unknown render selector) or belongs
//! to the CSV cleaner.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BloodworkError {
    // === Input ===
    /// Report file missing or unreadable.
    #[error("failed to read input {path}: {source}")]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Rendering ===
    #[error("unknown output format '{0}' (expected standard, detailed, compact or structured)")]
    UnknownRenderMode(String),

    #[error("failed to serialize structured output: {0}")]
    Serialize(#[from] serde_json::Error),

    // === Configuration ===
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    // === CSV cleaning ===
    #[error("the CSV file is empty or malformed")]
    EmptyCsv,

    /// Header row matched none of the known export kinds.
    #[error("unrecognized CSV export: expected a Sources, Tiroirs or Questions file")]
    UnrecognizedCsv,

    #[error("no column of the {kind} export was found")]
    NoMatchingColumns { kind: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, BloodworkError>;
