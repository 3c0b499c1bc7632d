use super::matching::{find_analysis_in_sections, AnalysisMatch};
use crate::config::{AnalysisSpec, GroupSpec, RuleCatalog};
use crate::numeric::{format_number, leading_number};
use crate::parser::footnotes::Footnotes;
use crate::types::*;
use chrono::NaiveDate;
use std::cmp::Ordering;

/// Unit converted by the `convert_mmol_to_mol` tag, and the factor applied.
const MMOL_RATIO_UNIT: &str = "g/mmol";
const MMOL_TO_MOL_FACTOR: f64 = 1000.0;

fn calendar_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%d/%m/%Y").ok()
}

/// Chronological order of `DD/MM/YYYY` strings; unparseable dates sort last.
pub fn compare_report_dates(a: &str, b: &str) -> Ordering {
    match (calendar_date(a), calendar_date(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sections grouped by sampling date, in first-seen order. Undated sections are dropped.
fn bucket_sections_by_date(sections: &[Section]) -> Vec<(&str, Vec<&Section>)> {
    let mut buckets: Vec<(&str, Vec<&Section>)> = Vec::new();
    for section in sections {
        let Some(date) = section.date.as_deref() else {
            continue;
        };
        match buckets.iter_mut().find(|(existing, _)| *existing == date) {
            Some((_, bucket)) => bucket.push(section),
            None => buckets.push((date, vec![section])),
        }
    }
    buckets
}

/// Selects, normalizes and groups results according to a [`RuleCatalog`].
pub struct RuleEngine<'a> {
    catalog: &'a RuleCatalog,
}

impl<'a> RuleEngine<'a> {
    pub fn new(catalog: &'a RuleCatalog) -> Self {
        Self { catalog }
    }

    pub fn apply(&self, parsed: &ParseResult) -> FilteredData {
        let mut buckets = bucket_sections_by_date(&parsed.sections);
        buckets.sort_by(|(a, _), (b, _)| compare_report_dates(a, b));

        let dates: Vec<String> = buckets.iter().map(|(date, _)| date.to_string()).collect();
        let mut date_groups = Vec::new();

        for (date, sections) in &buckets {
            let groups = self.filter_groups(date, sections, &parsed.footnotes);
            if groups.is_empty() {
                tracing::debug!("📭 No catalog analysis found for {date}");
                continue;
            }
            date_groups.push(DateGroup {
                date: date.to_string(),
                groups,
            });
        }

        tracing::info!(
            "⚙️  Selected results for {} of {} dates",
            date_groups.len(),
            dates.len()
        );

        FilteredData { dates, date_groups }
    }

    fn filter_groups(
        &self,
        date: &str,
        sections: &[&Section],
        footnotes: &Footnotes,
    ) -> Vec<FilteredGroup> {
        self.catalog
            .groups
            .iter()
            .filter_map(|group| self.filter_group(date, group, sections, footnotes))
            .collect()
    }

    fn filter_group(
        &self,
        date: &str,
        group: &GroupSpec,
        sections: &[&Section],
        footnotes: &Footnotes,
    ) -> Option<FilteredGroup> {
        let mut results = Vec::new();

        for analysis in &group.analyses {
            match find_analysis_in_sections(sections, footnotes, analysis) {
                Some(found) => {
                    tracing::debug!(
                        "   ✅ {} [{}] -> '{}' = {}",
                        analysis.name,
                        analysis.unit,
                        found.record.name,
                        found.record.value
                    );
                    results.push(self.build_result(analysis, &found));
                }
                None if analysis.required => {
                    tracing::warn!("Required analysis '{}' missing on {date}", analysis.name);
                }
                None => {}
            }
        }

        if results.is_empty() {
            return None;
        }
        Some(FilteredGroup {
            title: group.title.clone(),
            results,
        })
    }

    fn build_result(&self, analysis: &AnalysisSpec, found: &AnalysisMatch<'_>) -> FilteredResult {
        let raw_unit = found.unit.as_ref();
        let mut value = found.record.value.clone();

        if analysis.special == Some(SpecialTag::ConvertMmolToMol) && raw_unit == MMOL_RATIO_UNIT {
            if let Some(number) = leading_number(&value.replacen(',', ".", 1)) {
                value = format_number(number * MMOL_TO_MOL_FACTOR);
            }
        }

        FilteredResult {
            name: self.catalog.display_name(&analysis.name).to_string(),
            value,
            unit: self.catalog.display_unit(raw_unit).to_string(),
            abnormal: found.record.abnormal,
            // The conversion tag is consumed here whether or not it applied
            special: analysis
                .special
                .filter(|tag| *tag != SpecialTag::ConvertMmolToMol),
        }
    }
}

/// Apply `catalog` to a parse tree.
pub fn apply_rules(parsed: &ParseResult, catalog: &RuleCatalog) -> FilteredData {
    RuleEngine::new(catalog).apply(parsed)
}
