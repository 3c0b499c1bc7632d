// Line classification rules for the tabular report dump.
//
// Every helper takes the raw line (untrimmed) and the column separator.
// Header lines look like:
//   " BIOCHIMIE          ¦05/03/24                ¦Valeurs de"
// and result lines like:
//   "Sodium              ¦mmol/L  ¦   140  ¦136-145"

use crate::numeric::leading_number;
use crate::types::ResultRecord;
use regex::Regex;
use std::sync::LazyLock;

/// Titles containing this word are column headers, never sections.
const ANALYSIS_HEADER_MARKER: &str = "Analyse";

/// Placeholder some exports print in the value column for attached documents.
const DOCUMENT_PLACEHOLDER: &str = "PDF";

const SEPARATOR_RUN: &str = "___";

static SHORT_DATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{2})/([0-9]{2})/([0-9]{2})").unwrap());

static THRESHOLD_VALUE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[<>]?[0-9]").unwrap());

/// Blank lines and "____" rules carry nothing.
pub fn is_ignorable(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('_')
}

/// Extract the sampling date from the second column, widening `DD/MM/YY`
/// to `DD/MM/<century>YY`.
pub fn parse_date(line: &str, separator: char, century_prefix: &str) -> Option<String> {
    let field = line.split(separator).nth(1)?.trim();
    let captures = SHORT_DATE_REGEX.captures(field)?;
    Some(format!(
        "{}/{}/{}{}",
        &captures[1], &captures[2], century_prefix, &captures[3]
    ))
}

/// Shared preconditions for section and subsection titles.
fn is_title_candidate(trimmed: &str, separator: char) -> bool {
    !trimmed.is_empty()
        && !trimmed.contains(separator)
        && !trimmed.starts_with('_')
        && !trimmed.starts_with(|c: char| c.is_ascii_digit())
        && !trimmed.contains(ANALYSIS_HEADER_MARKER)
}

fn is_all_uppercase(text: &str) -> bool {
    text.to_uppercase() == text
}

fn starts_uppercase(text: &str) -> bool {
    text.chars()
        .next()
        .is_some_and(|first| first.to_uppercase().eq(std::iter::once(first)))
}

/// A section title has no lower-case letters at all ("BIOCHIMIE SANGUINE").
pub fn is_section_title(line: &str, separator: char) -> bool {
    let trimmed = line.trim();
    is_title_candidate(trimmed, separator) && is_all_uppercase(trimmed)
}

/// A subsection title starts upper-case but is not fully upper-case ("Ionogramme").
pub fn is_subsection_title(line: &str, separator: char) -> bool {
    let trimmed = line.trim();
    is_title_candidate(trimmed, separator) && starts_uppercase(trimmed) && !is_all_uppercase(trimmed)
}

/// Split a result line into a record, or reject it.
///
/// Columns are `name ¦ unit ¦ value ¦ reference`. A `+` or `-` anywhere in the
/// value column flags the value as abnormal and is stripped from the value.
/// Values must start numerically, or be a threshold such as `<0.01`.
pub fn parse_result_line(line: &str, separator: char) -> Option<ResultRecord> {
    let parts: Vec<&str> = line.split(separator).map(str::trim).collect();
    if parts.len() < 3 {
        return None;
    }

    let name = parts[0];
    let unit = parts[1];
    let value_raw = parts[2];
    let ref_range = parts.get(3).copied().unwrap_or_default();

    if name.is_empty()
        || value_raw.is_empty()
        || value_raw == DOCUMENT_PLACEHOLDER
        || name.contains(SEPARATOR_RUN)
    {
        return None;
    }

    let abnormal = value_raw.contains(['+', '-']);
    let value: String = value_raw
        .chars()
        .filter(|c| !matches!(c, '+' | '-') && !c.is_whitespace())
        .collect();

    if leading_number(&value).is_none() && !THRESHOLD_VALUE_REGEX.is_match(&value) {
        return None;
    }

    Some(ResultRecord {
        name: name.to_string(),
        unit: unit.to_string(),
        value,
        ref_range: ref_range.to_string(),
        abnormal,
    })
}
