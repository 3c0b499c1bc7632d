use super::value::{format_value, group_title};
use crate::types::{FilteredData, FilteredGroup};

const RULE_WIDTH: usize = 60;
const NAME_WIDTH: usize = 25;
const ABNORMAL_MARKER: &str = " ⚠️  ANORMAL";

fn push_boxed(lines: &mut Vec<String>, heading: &str) {
    let rule = "=".repeat(RULE_WIDTH);
    lines.push(rule.clone());
    lines.push(heading.to_string());
    lines.push(rule);
}

fn push_group(lines: &mut Vec<String>, group: &FilteredGroup) {
    if let Some(title) = group_title(group) {
        push_boxed(lines, &title);
        lines.push(String::new());
    }

    for result in &group.results {
        let Some(value) = format_value(result) else {
            continue;
        };
        let mut line = format!("{:<width$} {value}", result.name, width = NAME_WIDTH);
        if result.abnormal {
            line.push_str(ABNORMAL_MARKER);
        }
        lines.push(line);
    }
    lines.push(String::new());
}

/// Boxed headings, padded names and abnormal markers.
pub fn render_detailed(data: &FilteredData) -> String {
    let mut lines: Vec<String> = Vec::new();

    if !data.dates.is_empty() {
        push_boxed(&mut lines, "DATES");
        lines.extend(data.dates.iter().cloned());
        lines.push(String::new());
    }

    for date_group in &data.date_groups {
        push_boxed(&mut lines, &date_group.date);
        lines.push(String::new());
        for group in &date_group.groups {
            push_group(&mut lines, group);
        }
    }

    lines.join("\n")
}
