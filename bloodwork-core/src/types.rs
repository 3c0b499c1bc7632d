use crate::parser::footnotes::Footnotes;
use serde::{Deserialize, Serialize};

// ===== PARSE TREE =====
// Produced once per input by the parser and read-only afterwards.
// Sections own subsections, subsections own result records.

/// One analysis line of the raw report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    /// Raw label, possibly truncated ("DFG calculé par…¹")
    pub name: String,
    pub unit: String,
    /// Cleaned value; keeps a leading `<`/`>` for thresholds
    pub value: String,
    /// Reference range as printed, not interpreted
    pub ref_range: String,
    /// The raw value carried a `+` or `-` marker
    pub abnormal: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subsection {
    /// Empty for the default bucket of a section without named panels
    pub name: String,
    pub results: Vec<ResultRecord>,
}

impl Subsection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            results: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    /// Normalized `DD/MM/YYYY` sampling date in effect when the section opened
    pub date: Option<String>,
    pub subsections: Vec<Subsection>,
}

impl Section {
    pub fn new(name: impl Into<String>, date: Option<String>) -> Self {
        Self {
            name: name.into(),
            date,
            subsections: Vec::new(),
        }
    }

    /// Total number of result records across subsections.
    pub fn result_count(&self) -> usize {
        self.subsections.iter().map(|s| s.results.len()).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParseResult {
    /// Unique dates in first-seen order
    pub dates: Vec<String>,
    pub sections: Vec<Section>,
    pub footnotes: Footnotes,
}

// ===== CATALOG TAGS =====

/// Per-analysis behaviour flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialTag {
    /// Renal filtration rate: prefer the CKD-EPI footnoted line, print "(CKD-EPI)"
    Dfg,
    /// Oxygen flow: folded into the blood gas group title
    GazDebit,
    /// Ratio reported per mmol, displayed per mol
    ConvertMmolToMol,
}

/// Where an analysis may be looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisContext {
    Urine,
}

// ===== FILTERED VIEW =====
// Output of the rule engine, input of every renderer.
// Never contains an empty group or an empty date group.

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilteredResult {
    /// Display name from the name mapping
    pub name: String,
    pub value: String,
    /// Display unit from the unit mapping
    pub unit: String,
    pub abnormal: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special: Option<SpecialTag>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilteredGroup {
    pub title: Option<String>,
    pub results: Vec<FilteredResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateGroup {
    pub date: String,
    pub groups: Vec<FilteredGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredData {
    /// Every sampling date that had sections, chronologically sorted
    pub dates: Vec<String>,
    pub date_groups: Vec<DateGroup>,
}

impl FilteredData {
    pub fn is_empty(&self) -> bool {
        self.date_groups.is_empty()
    }

    /// Iterate every rendered group across dates, in output order.
    pub fn groups(&self) -> impl Iterator<Item = &FilteredGroup> {
        self.date_groups.iter().flat_map(|dg| dg.groups.iter())
    }
}
