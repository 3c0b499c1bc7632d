use super::value::{format_result_line, group_title};
use crate::types::FilteredData;

/// Date, blank line, then each group followed by a blank line.
pub fn render_standard(data: &FilteredData) -> String {
    let mut lines: Vec<String> = Vec::new();

    for date_group in &data.date_groups {
        lines.push(date_group.date.clone());
        lines.push(String::new());

        for group in &date_group.groups {
            if let Some(title) = group_title(group) {
                lines.push(title);
            }
            lines.extend(group.results.iter().filter_map(format_result_line));
            lines.push(String::new());
        }
    }

    if lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DateGroup, FilteredGroup, FilteredResult, SpecialTag};

    fn result(name: &str, value: &str, unit: &str) -> FilteredResult {
        FilteredResult {
            name: name.to_string(),
            value: value.to_string(),
            unit: unit.to_string(),
            abnormal: false,
            special: None,
        }
    }

    #[test]
    fn test_standard_layout() {
        let data = FilteredData {
            dates: vec!["05/03/2024".to_string()],
            date_groups: vec![DateGroup {
                date: "05/03/2024".to_string(),
                groups: vec![
                    FilteredGroup {
                        title: None,
                        results: vec![result("Hb", "13,2", "g/dL"), result("VGM", "88", "fL")],
                    },
                    FilteredGroup {
                        title: Some("Gaz du sang sous O2".to_string()),
                        results: vec![
                            FilteredResult {
                                special: Some(SpecialTag::GazDebit),
                                ..result("Débit O2", "2", "L/min")
                            },
                            result("pH", "7.35", ""),
                        ],
                    },
                ],
            }],
        };

        assert_eq!(
            render_standard(&data),
            "05/03/2024\n\nHb 13.2 g/dL\nVGM 88 fL\n\nGaz du sang sous O2 2 L/min\npH 7.35"
        );
    }

    #[test]
    fn test_empty_data_renders_nothing() {
        assert_eq!(render_standard(&FilteredData::default()), "");
    }
}
