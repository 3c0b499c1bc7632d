// Bloodwork Core Library
//
// Turns plain-text lab report dumps into short, readable summaries:
// raw text → parse tree → catalog-filtered view → rendered text.
// Also hosts the knowledge-base CSV cleaner.

pub mod config;
pub mod csv_cleaner;
pub mod error;
pub mod numeric;
pub mod parser;
pub mod processor;
pub mod render;
pub mod rules;
pub mod types;

// Re-export main types and functions for easy use
pub use types::*;
pub use config::{AnalysisSpec, FormatterConfig, GroupSpec, ParserConfig, RuleCatalog};
pub use csv_cleaner::{clean_csv, CleanStats, CleanedCsv, CsvKind};
pub use error::{BloodworkError, Result};
pub use parser::{parse, ReportParser};
pub use processor::{PipelineStages, ReportProcessor};
pub use render::{render, RenderMode};
pub use rules::{apply_rules, RuleEngine};
