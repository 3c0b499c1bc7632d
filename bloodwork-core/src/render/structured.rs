use crate::error::Result;
use crate::types::FilteredData;

/// Pretty-printed JSON of the filtered view.
pub fn render_structured(data: &FilteredData) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}
