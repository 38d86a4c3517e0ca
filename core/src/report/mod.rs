pub mod builder;
pub mod categories;
pub mod sections;

use crate::error::CoreResult;
use crate::sanitize::value::RawValue;
use std::path::Path;

/// Reads a raw analysis document (JSON) into the raw value model.
pub fn read_analysis_json(path: impl AsRef<Path>) -> CoreResult<RawValue> {
    let raw = std::fs::read_to_string(path.as_ref())?;
    let value: serde_json::Value = serde_json::from_str(&raw)?;
    Ok(RawValue::from(value))
}
