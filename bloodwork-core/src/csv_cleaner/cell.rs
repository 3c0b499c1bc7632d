use regex::Regex;
use std::sync::LazyLock;

/// Columns whose cleaned cells end with a single space.
const TRAILING_SPACE_COLUMNS: [&str; 6] = ["books", "knowledges", "title", "knowledge", "lessons", "similar"];

const URL_COLUMN: &str = "url";

static PARENTHESISED_LINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(https?://[^)]+\)").unwrap());

static WHITESPACE_RUN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static COMMA_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*,\s*").unwrap());

static FLOAT_INTEGER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([012])\.0\b").unwrap());

/// Normalize one cell of column `column`.
///
/// Links in parentheses are dropped (except in the URL column), list commas
/// become ` ; ` and `1.0`-style spreadsheet floats become integers.
pub fn clean_cell(value: &str, column: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let column = column.to_lowercase();
    let mut cleaned = if column == URL_COLUMN {
        trimmed.to_string()
    } else {
        PARENTHESISED_LINK_REGEX.replace_all(trimmed, " ").into_owned()
    };

    cleaned = WHITESPACE_RUN_REGEX.replace_all(&cleaned, " ").into_owned();
    cleaned = COMMA_REGEX.replace_all(&cleaned, " ; ").trim().to_string();
    cleaned = FLOAT_INTEGER_REGEX.replace_all(&cleaned, "$1").into_owned();

    if TRAILING_SPACE_COLUMNS.contains(&column.as_str()) {
        cleaned.push(' ');
    }
    cleaned
}
