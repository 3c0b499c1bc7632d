// Renderers - turn a FilteredData view into one textual representation
// - value.rs: value/unit formatting and group titles shared by text modes
// - standard.rs, detailed.rs, compact.rs: human-readable layouts
// - structured.rs: JSON dump

pub mod compact;
pub mod detailed;
pub mod standard;
pub mod structured;
pub mod value;

use crate::error::{BloodworkError, Result};
use crate::types::FilteredData;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use compact::render_compact;
pub use detailed::render_detailed;
pub use standard::render_standard;
pub use structured::render_structured;
pub use value::{format_value, normalize_value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Standard,
    Detailed,
    Compact,
    Structured,
}

impl RenderMode {
    pub const ALL: [RenderMode; 4] = [
        RenderMode::Standard,
        RenderMode::Detailed,
        RenderMode::Compact,
        RenderMode::Structured,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RenderMode::Standard => "standard",
            RenderMode::Detailed => "detailed",
            RenderMode::Compact => "compact",
            RenderMode::Structured => "structured",
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderMode {
    type Err = BloodworkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(RenderMode::Standard),
            "detailed" => Ok(RenderMode::Detailed),
            "compact" => Ok(RenderMode::Compact),
            "structured" | "json" => Ok(RenderMode::Structured),
            _ => Err(BloodworkError::UnknownRenderMode(s.to_string())),
        }
    }
}

/// Render `data` in the given mode.
pub fn render(data: &FilteredData, mode: RenderMode) -> Result<String> {
    tracing::debug!("🖨️  Rendering {} date groups as {mode}", data.date_groups.len());

    match mode {
        RenderMode::Standard => Ok(render_standard(data)),
        RenderMode::Detailed => Ok(render_detailed(data)),
        RenderMode::Compact => Ok(render_compact(data)),
        RenderMode::Structured => render_structured(data),
    }
}
