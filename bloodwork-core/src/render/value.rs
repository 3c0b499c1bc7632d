use crate::numeric::{format_number, leading_number};
use crate::types::{FilteredGroup, FilteredResult, SpecialTag};

const GAS_GROUP_MARKER: &str = "Gaz du sang";
const PERCENT_UNIT: &str = "%";
const PH_NAME: &str = "pH";

/// Normalize a raw value: first comma becomes a dot, then a numeric prefix is
/// re-rendered in canonical form. Non-numeric values (`<0.01`) are kept.
pub fn normalize_value(raw: &str) -> String {
    let dotted = raw.replacen(',', ".", 1);
    match leading_number(&dotted) {
        Some(number) => format_number(number),
        None => dotted,
    }
}

/// Value text with its unit, as printed after the name.
/// `None` for results that never get a line of their own.
pub fn format_value(result: &FilteredResult) -> Option<String> {
    let value = normalize_value(&result.value);

    match result.special {
        Some(SpecialTag::Dfg) => return Some(format!("{value} {} (CKD-EPI)", result.unit)),
        Some(SpecialTag::GazDebit) => return None,
        _ => {}
    }

    if result.unit == PERCENT_UNIT {
        return Some(format!("{value}%"));
    }
    if result.name == PH_NAME {
        return Some(value);
    }
    Some(format!("{value} {}", result.unit))
}

/// `"<name> <value>"`, or `None` when the result is folded elsewhere.
pub fn format_result_line(result: &FilteredResult) -> Option<String> {
    format_value(result).map(|value| format!("{} {value}", result.name))
}

/// Group title, with the oxygen flow appended for blood gas groups.
pub fn group_title(group: &FilteredGroup) -> Option<String> {
    let title = group.title.as_deref()?;

    if title.contains(GAS_GROUP_MARKER) {
        let flow = group
            .results
            .iter()
            .find(|r| r.special == Some(SpecialTag::GazDebit) && !r.value.is_empty());
        if let Some(flow) = flow {
            return Some(format!("{title} {} {}", flow.value, flow.unit));
        }
    }

    Some(title.to_string())
}
