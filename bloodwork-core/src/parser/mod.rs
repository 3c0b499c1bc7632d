//! Report parser
//!
//! Turns the raw text dump of a lab report into a tree of dated sections,
//! named subsections and result records.
//!
//! ## Line scan
//!
//! ```text
//! raw line
//!     ↓ blank / "____"          → skipped
//!     ↓ "¦DD/MM/YY" in col 2    → current date (line keeps being classified)
//!     ↓ "¹ text"                → footnote definition
//!     ↓ ALL CAPS title          → new section (captures current date)
//!     ↓ Capitalised title       → new subsection (needs an open section)
//!     ↓ "name ¦unit ¦value ¦…"  → result record
//!     ↓ anything else           → dropped
//! ```
//!
//! Parsing is total: unrecognised lines are silently dropped.

pub mod footnotes;
pub mod line_classifier;

pub use footnotes::{clean_analysis_name, Footnotes};

use crate::config::ParserConfig;
use crate::types::{ParseResult, ResultRecord, Section, Subsection};
use footnotes::parse_footnote;
use line_classifier::{
    is_ignorable, is_section_title, is_subsection_title, parse_date, parse_result_line,
};

/// Scratch state for one parse call.
#[derive(Debug, Default)]
struct ParseCursor {
    section: Option<usize>,
    subsection: Option<usize>,
    date: Option<String>,
}

pub struct ReportParser {
    config: ParserConfig,
}

impl Default for ReportParser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

impl ReportParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn parse(&self, text: &str) -> ParseResult {
        let separator = self.config.column_separator;
        let mut result = ParseResult::default();
        let mut cursor = ParseCursor::default();

        for line in text.lines() {
            if is_ignorable(line) {
                continue;
            }

            if let Some(date) = parse_date(line, separator, &self.config.century_prefix) {
                if !result.dates.contains(&date) {
                    tracing::debug!("📅 New sampling date {date}");
                    result.dates.push(date.clone());
                }
                cursor.date = Some(date);
            }

            if let Some((symbol, text)) = parse_footnote(line) {
                result.footnotes.insert(symbol, text);
                continue;
            }

            if is_section_title(line, separator) {
                let name = line.trim();
                tracing::debug!("📂 Section '{name}' ({:?})", cursor.date);
                result
                    .sections
                    .push(Section::new(name, cursor.date.clone()));
                cursor.section = Some(result.sections.len() - 1);
                cursor.subsection = None;
                continue;
            }

            if is_subsection_title(line, separator) {
                if let Some(section_idx) = cursor.section {
                    let section = &mut result.sections[section_idx];
                    section.subsections.push(Subsection::new(line.trim()));
                    cursor.subsection = Some(section.subsections.len() - 1);
                    continue;
                }
            }

            if line.contains(separator) {
                if let Some(record) = parse_result_line(line, separator) {
                    attach_record(&mut result.sections, &cursor, record);
                }
            }
        }

        tracing::info!(
            "📄 Parsed {} sections, {} dates, {} footnotes",
            result.sections.len(),
            result.dates.len(),
            result.footnotes.len()
        );

        result
    }
}

/// File a record under the open subsection, or under the section's default
/// (unnamed) subsection. Records seen before any section are discarded.
fn attach_record(sections: &mut [Section], cursor: &ParseCursor, record: ResultRecord) {
    let Some(section) = cursor.section.and_then(|idx| sections.get_mut(idx)) else {
        tracing::debug!("Dropping '{}' found outside any section", record.name);
        return;
    };

    if let Some(subsection) = cursor
        .subsection
        .and_then(|idx| section.subsections.get_mut(idx))
    {
        subsection.results.push(record);
        return;
    }

    if section.subsections.is_empty() {
        section.subsections.push(Subsection::new(""));
    }
    if let Some(default_bucket) = section.subsections.last_mut() {
        default_bucket.results.push(record);
    }
}

/// Parse with the default parser configuration.
pub fn parse(text: &str) -> ParseResult {
    ReportParser::default().parse(text)
}
