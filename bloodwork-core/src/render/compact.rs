use super::value::{format_value, group_title};
use crate::types::{FilteredData, FilteredGroup};

fn group_line(group: &FilteredGroup) -> Option<String> {
    let items: Vec<String> = group
        .results
        .iter()
        .filter_map(|r| format_value(r).map(|value| format!("{} {value}", r.name)))
        .collect();
    if items.is_empty() {
        return None;
    }

    let prefix = group_title(group)
        .map(|title| format!("{title}: "))
        .unwrap_or_default();
    Some(format!("{prefix}{}", items.join(", ")))
}

/// A `Dates:` line, then one line per group.
pub fn render_compact(data: &FilteredData) -> String {
    let mut lines: Vec<String> = Vec::new();

    if !data.dates.is_empty() {
        lines.push(format!("Dates: {}", data.dates.join(", ")));
    }
    lines.extend(data.groups().filter_map(group_line));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DateGroup, FilteredResult, SpecialTag};

    fn result(name: &str, value: &str, unit: &str, special: Option<SpecialTag>) -> FilteredResult {
        FilteredResult {
            name: name.to_string(),
            value: value.to_string(),
            unit: unit.to_string(),
            abnormal: false,
            special,
        }
    }

    #[test]
    fn test_compact_one_line_per_group() {
        let data = FilteredData {
            dates: vec!["01/02/2024".to_string(), "03/02/2024".to_string()],
            date_groups: vec![
                DateGroup {
                    date: "01/02/2024".to_string(),
                    groups: vec![FilteredGroup {
                        title: None,
                        results: vec![
                            result("Na", "140", "mmol/L", None),
                            result("K", "4,1", "mmol/L", None),
                        ],
                    }],
                },
                DateGroup {
                    date: "03/02/2024".to_string(),
                    groups: vec![FilteredGroup {
                        title: Some("Gaz du sang sous O2".to_string()),
                        results: vec![
                            result("Débit O2", "3", "L/min", Some(SpecialTag::GazDebit)),
                            result("pH", "7.40", "", None),
                        ],
                    }],
                },
            ],
        };

        assert_eq!(
            render_compact(&data),
            "Dates: 01/02/2024, 03/02/2024\n\
             Na 140 mmol/L, K 4.1 mmol/L\n\
             Gaz du sang sous O2 3 L/min: pH 7.4"
        );
    }
}
