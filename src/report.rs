//! JSON rendering of rename plans.

use crate::batch::RenamePlan;
use crate::error::{Error, Result};

/// JSON output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Compact single-line JSON
    Compact,
    /// Pretty-printed with 2-space indentation
    #[default]
    Pretty,
}

/// Convert a rename plan to JSON.
pub fn to_json(plan: &RenamePlan, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Compact => serde_json::to_string(plan),
        JsonFormat::Pretty => serde_json::to_string_pretty(plan),
    };
    json.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
