use crate::config::AnalysisSpec;
use crate::parser::footnotes::{has_footnote_marker, strip_truncation_markers, Footnotes};
use crate::types::{AnalysisContext, ResultRecord, Section, Subsection};
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// Full unit of the renal filtration rate; reports often cut it to "mL/min/…".
pub const CANONICAL_DFG_UNIT: &str = "mL/min/1.73m²";
const TRUNCATED_DFG_UNIT_PREFIX: &str = "mL/min/";

const DFG_MARKER: &str = "DFG";
const URINE_MARKER: &str = "urinaire";

/// A record selected for one analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisMatch<'a> {
    pub record: &'a ResultRecord,
    /// Raw unit, completed to the canonical DFG unit when it was truncated
    pub unit: Cow<'a, str>,
}

impl<'a> AnalysisMatch<'a> {
    fn as_is(record: &'a ResultRecord) -> Self {
        Self {
            record,
            unit: Cow::Borrowed(record.unit.as_str()),
        }
    }

    fn with_completed_unit(record: &'a ResultRecord) -> Self {
        if record.unit.starts_with(TRUNCATED_DFG_UNIT_PREFIX) {
            Self {
                record,
                unit: Cow::Borrowed(CANONICAL_DFG_UNIT),
            }
        } else {
            Self::as_is(record)
        }
    }
}

/// Urine panels are recognised by "urinaire" in the section or subsection name.
pub fn is_urine_subsection(section: &Section, subsection: &Subsection) -> bool {
    section.name.to_lowercase().contains(URINE_MARKER)
        || subsection.name.to_lowercase().contains(URINE_MARKER)
}

static WHITESPACE_RUN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

fn normalize_name(name: &str) -> String {
    WHITESPACE_RUN_REGEX
        .replace_all(&name.to_lowercase(), " ")
        .into_owned()
}

fn units_compatible(target_unit: &str, record_unit: &str) -> bool {
    record_unit == target_unit
        || (target_unit == CANONICAL_DFG_UNIT && record_unit.starts_with(TRUNCATED_DFG_UNIT_PREFIX))
}

/// Tolerates truncated labels: the target starts with the record name, or the
/// record name starts with the first two words of the target.
fn names_fuzzy_match(target_name: &str, record_clean_name: &str) -> bool {
    let target = normalize_name(target_name);
    let record = normalize_name(record_clean_name);
    let leading_words = target.split(' ').take(2).collect::<Vec<_>>().join(" ");

    target.starts_with(&record) || record.starts_with(&leading_words)
}

/// Find the record reported for `spec` among the sections of one date.
///
/// Traversal is section → subsection → record order, and the first exact
/// match (name and unit) wins. Otherwise a unit-compatible fuzzy name match
/// wins, except for DFG analyses: there a footnoted or fully-named record is
/// taken immediately while other fuzzy matches (e.g. the MDRD variant) are
/// only kept as fallbacks, the first of which is used once the scan is done.
pub fn find_analysis_in_sections<'a>(
    sections: &[&'a Section],
    footnotes: &Footnotes,
    spec: &AnalysisSpec,
) -> Option<AnalysisMatch<'a>> {
    let wants_urine = spec.context == Some(AnalysisContext::Urine);
    let is_dfg = spec.name.contains(DFG_MARKER);
    let mut deferred: Vec<&'a ResultRecord> = Vec::new();

    for section in sections {
        for subsection in &section.subsections {
            // Known quirk: analyses without context never match inside a urine panel,
            // even ones unrelated to urine testing.
            if is_urine_subsection(section, subsection) != wants_urine {
                continue;
            }

            for record in &subsection.results {
                let clean_name = strip_truncation_markers(&record.name);
                let full_name = footnotes.expand(&record.name).unwrap_or(&clean_name);

                if (clean_name == spec.name || full_name == spec.name) && record.unit == spec.unit {
                    return Some(AnalysisMatch::as_is(record));
                }

                if !units_compatible(&spec.unit, &record.unit)
                    || !names_fuzzy_match(&spec.name, &clean_name)
                {
                    continue;
                }

                if !is_dfg {
                    return Some(AnalysisMatch::as_is(record));
                }

                if has_footnote_marker(&record.name) || full_name == spec.name {
                    return Some(AnalysisMatch::with_completed_unit(record));
                }
                deferred.push(record);
            }
        }
    }

    deferred.first().copied().map(AnalysisMatch::with_completed_unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, unit: &str, value: &str) -> ResultRecord {
        ResultRecord {
            name: name.to_string(),
            unit: unit.to_string(),
            value: value.to_string(),
            ref_range: String::new(),
            abnormal: false,
        }
    }

    fn section(name: &str, subsections: Vec<(&str, Vec<ResultRecord>)>) -> Section {
        Section {
            name: name.to_string(),
            date: Some("05/03/2024".to_string()),
            subsections: subsections
                .into_iter()
                .map(|(name, results)| Subsection {
                    name: name.to_string(),
                    results,
                })
                .collect(),
        }
    }

    fn dfg_spec() -> AnalysisSpec {
        AnalysisSpec::new("DFG calculé par CKD-EPI", CANONICAL_DFG_UNIT)
    }

    #[test]
    fn test_exact_match_wins_in_traversal_order() {
        let s = section(
            "BIOCHIMIE",
            vec![(
                "",
                vec![
                    record("Sodium", "mmol/L", "140"),
                    record("Sodium", "mmol/L", "150"),
                ],
            )],
        );
        let found = find_analysis_in_sections(&[&s], &Footnotes::new(), &AnalysisSpec::new("Sodium", "mmol/L"));
        assert_eq!(found.unwrap().record.value, "140");
    }

    #[test]
    fn test_unit_mismatch_is_not_a_match() {
        let s = section("BIOCHIMIE", vec![("", vec![record("Créatinine", "mg/L", "9")])]);
        let found = find_analysis_in_sections(&[&s], &Footnotes::new(), &AnalysisSpec::new("Créatinine", "µmol/L"));
        assert!(found.is_none());
    }

    #[test]
    fn test_fuzzy_match_on_truncated_name() {
        let s = section("BIOCHIMIE", vec![("", vec![record("Bilirubine tot", "µmol/L", "12")])]);
        let spec = AnalysisSpec::new("Bilirubine totale", "µmol/L");
        let found = find_analysis_in_sections(&[&s], &Footnotes::new(), &spec);
        assert_eq!(found.unwrap().record.value, "12");
    }

    #[test]
    fn test_fuzzy_match_on_leading_words() {
        let s = section(
            "HEMATOLOGIE",
            vec![("", vec![record("Polynucléaires  Neutrophiles (PNN)", "x10*9/L", "6.1")])],
        );
        let spec = AnalysisSpec::new("Polynucléaires neutrophiles", "x10*9/L");
        let found = find_analysis_in_sections(&[&s], &Footnotes::new(), &spec);
        assert_eq!(found.unwrap().record.value, "6.1");
    }

    #[test]
    fn test_dfg_prefers_footnoted_record_and_completes_unit() {
        let s = section(
            "BIOCHIMIE",
            vec![(
                "",
                vec![
                    record("DFG calculé par MDRD", "mL/min/…", "70"),
                    record("DFG calculé par…¹", "mL/min/…", "85"),
                ],
            )],
        );
        let mut footnotes = Footnotes::new();
        footnotes.insert('¹', "DFG calculé par CKD-EPI");

        let found = find_analysis_in_sections(&[&s], &footnotes, &dfg_spec()).unwrap();
        assert_eq!(found.record.value, "85");
        assert_eq!(found.unit, CANONICAL_DFG_UNIT);
    }

    #[test]
    fn test_dfg_falls_back_to_first_deferred_candidate() {
        let s = section(
            "BIOCHIMIE",
            vec![(
                "",
                vec![
                    record("DFG calculé par MDRD", "mL/min/…", "70"),
                    record("DFG calculé selon Cockcroft", "mL/min/…", "75"),
                ],
            )],
        );
        let found = find_analysis_in_sections(&[&s], &Footnotes::new(), &dfg_spec()).unwrap();
        assert_eq!(found.record.value, "70");
        assert_eq!(found.unit, CANONICAL_DFG_UNIT);
    }

    #[test]
    fn test_exact_dfg_match_returns_immediately() {
        let s = section(
            "BIOCHIMIE",
            vec![(
                "",
                vec![
                    record("DFG calculé par MDRD", "mL/min/…", "70"),
                    record("DFG calculé par CKD-EPI", CANONICAL_DFG_UNIT, "90"),
                ],
            )],
        );
        let found = find_analysis_in_sections(&[&s], &Footnotes::new(), &dfg_spec()).unwrap();
        assert_eq!(found.record.value, "90");
        assert_eq!(found.unit, CANONICAL_DFG_UNIT);
    }

    #[test]
    fn test_urine_context_filters_panels() {
        let blood = section("BIOCHIMIE", vec![("", vec![record("Sodium", "mmol/L", "140")])]);
        let urine = section(
            "EXAMENS",
            vec![("Ionogramme urinaire", vec![record("Sodium", "mmol/L", "60")])],
        );
        let sections = [&blood, &urine];

        let plain = find_analysis_in_sections(&sections, &Footnotes::new(), &AnalysisSpec::new("Sodium", "mmol/L"));
        assert_eq!(plain.unwrap().record.value, "140");

        let urinary = AnalysisSpec::new("Sodium", "mmol/L").with_context(AnalysisContext::Urine);
        let found = find_analysis_in_sections(&sections, &Footnotes::new(), &urinary);
        assert_eq!(found.unwrap().record.value, "60");
    }

    #[test]
    fn test_uncontextualised_analysis_never_matches_in_urine_section() {
        let urine = section(
            "BIOCHIMIE URINAIRE",
            vec![("", vec![record("CRP", "mg/L", "3")])],
        );
        let found = find_analysis_in_sections(&[&urine], &Footnotes::new(), &AnalysisSpec::new("CRP", "mg/L"));
        assert!(found.is_none());
    }
}
