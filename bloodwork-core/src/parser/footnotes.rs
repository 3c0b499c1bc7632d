// Footnote resolution
//
// Reports truncate long analysis names and point to a footnote instead:
// "DFG calculé par…¹" with "¹ DFG calculé par CKD-EPI" further down.
// Footnotes are collected during the single parsing pass and are complete
// by the time the rule engine resolves names.

use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::sync::LazyLock;

/// Superscript digits used as footnote markers (no superscript zero).
pub const FOOTNOTE_SYMBOLS: [char; 9] = ['¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];

pub const ELLIPSIS: char = '…';

pub fn is_footnote_symbol(c: char) -> bool {
    FOOTNOTE_SYMBOLS.contains(&c)
}

/// True when the raw name carries a superscript footnote marker.
pub fn has_footnote_marker(name: &str) -> bool {
    name.chars().any(is_footnote_symbol)
}

/// Symbol → text mapping that keeps first-definition order.
///
/// Lookups scan in that order, so when a name carries several markers the
/// earliest defined footnote wins. Redefining a symbol replaces its text but
/// keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Footnotes {
    entries: Vec<(char, String)>,
}

impl Footnotes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: char, text: impl Into<String>) {
        let text = text.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == symbol) {
            Some(entry) => entry.1 = text,
            None => self.entries.push((symbol, text)),
        }
    }

    pub fn get(&self, symbol: char) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == symbol)
            .map(|(_, text)| text.as_str())
    }

    /// Text of the first footnote whose symbol occurs in `name`.
    pub fn expand(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(symbol, _)| name.contains(*symbol))
            .map(|(_, text)| text.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &str)> {
        self.entries.iter().map(|(symbol, text)| (*symbol, text.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Footnotes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (symbol, text) in &self.entries {
            map.serialize_entry(&symbol.to_string(), text)?;
        }
        map.end()
    }
}

static FOOTNOTE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([¹²³⁴⁵⁶⁷⁸⁹])\s+(.+)$").unwrap());

static TRUNCATION_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"…[¹²³⁴⁵⁶⁷⁸⁹]").unwrap());

/// Recognise a footnote definition line such as `"¹ DFG calculé par CKD-EPI"`.
pub fn parse_footnote(line: &str) -> Option<(char, String)> {
    let captures = FOOTNOTE_REGEX.captures(line)?;
    let symbol = captures.get(1)?.as_str().chars().next()?;
    let text = captures.get(2)?.as_str().to_string();
    Some((symbol, text))
}

/// Drop every "…¹"-style truncation marker and trim.
pub fn strip_truncation_markers(name: &str) -> String {
    TRUNCATION_MARKER_REGEX.replace_all(name, "").trim().to_string()
}

/// Resolve a raw analysis label to its display form: a name carrying a known
/// footnote symbol becomes that footnote's text, then stray ellipses are removed.
pub fn clean_analysis_name(name: &str, footnotes: &Footnotes) -> String {
    let resolved = footnotes.expand(name).unwrap_or(name);
    resolved.replace(ELLIPSIS, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_footnotes() -> Footnotes {
        let mut footnotes = Footnotes::new();
        footnotes.insert('¹', "DFG calculé par CKD-EPI");
        footnotes.insert('²', "Protéine sérique amyloide A");
        footnotes
    }

    #[test]
    fn test_parse_footnote_line() {
        assert_eq!(
            parse_footnote("¹ DFG calculé par CKD-EPI"),
            Some(('¹', "DFG calculé par CKD-EPI".to_string()))
        );
        assert_eq!(
            parse_footnote("⁴\tHémoglobine A1c"),
            Some(('⁴', "Hémoglobine A1c".to_string()))
        );
    }

    #[test]
    fn test_parse_footnote_rejects_other_lines() {
        assert_eq!(parse_footnote("¹DFG"), None);
        assert_eq!(parse_footnote("⁰ zero is not a marker"), None);
        assert_eq!(parse_footnote("Sodium ¦mmol/L ¦140"), None);
        assert_eq!(parse_footnote(" ¹ indented"), None);
    }

    #[test]
    fn test_insert_keeps_first_position() {
        let mut footnotes = sample_footnotes();
        footnotes.insert('¹', "DFG (redefined)");

        let symbols: Vec<char> = footnotes.iter().map(|(symbol, _)| symbol).collect();
        assert_eq!(symbols, vec!['¹', '²']);
        assert_eq!(footnotes.get('¹'), Some("DFG (redefined)"));
    }

    #[test]
    fn test_expand_uses_definition_order() {
        let footnotes = sample_footnotes();
        assert_eq!(footnotes.expand("Truc…²…¹"), Some("DFG calculé par CKD-EPI"));
        assert_eq!(footnotes.expand("Sodium"), None);
    }

    #[test]
    fn test_clean_analysis_name() {
        let footnotes = sample_footnotes();
        assert_eq!(
            clean_analysis_name("DFG calculé par…¹", &footnotes),
            "DFG calculé par CKD-EPI"
        );
        assert_eq!(clean_analysis_name(" Bilirubine tot… ", &footnotes), "Bilirubine tot");
        assert_eq!(clean_analysis_name("Sodium", &footnotes), "Sodium");
    }

    #[test]
    fn test_strip_truncation_markers() {
        assert_eq!(strip_truncation_markers("DFG calculé par…¹"), "DFG calculé par");
        assert_eq!(strip_truncation_markers("Bilirubine tot…"), "Bilirubine tot…");
    }

    #[test]
    fn test_has_footnote_marker() {
        assert!(has_footnote_marker("DFG calculé par…¹"));
        assert!(!has_footnote_marker("DFG calculé par MDRD"));
    }

    #[test]
    fn test_serializes_as_ordered_map() {
        let json = serde_json::to_string(&sample_footnotes()).unwrap();
        assert_eq!(
            json,
            r#"{"¹":"DFG calculé par CKD-EPI","²":"Protéine sérique amyloide A"}"#
        );
    }
}
