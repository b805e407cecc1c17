pub mod conversion;
pub mod definition;

pub use conversion::*;
pub use definition::*;

use crate::error::SpecError;

/// Parses a JSON node-type declaration into an [`InputSpec`].
///
/// Accepts both snake_case and camelCase field names, so a spec emitted by a
/// JavaScript-side editor deserializes unchanged.
pub fn spec_from_json(json: &str) -> Result<InputSpec, SpecError> {
    serde_json::from_str(json).map_err(|e| SpecError::JsonParseError(e.to_string()))
}
