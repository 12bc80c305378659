use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

use crate::matcher::AttributeSpec;

/// Reads the criteria list from either a YAML sequence or a JSON encoded
/// string, the form it takes when set through the environment.
///
/// Malformed entries are rejected rather than skipped: dropping a criterion
/// would make the filter match more records than configured.
pub fn deserialize_attributes<'de, D>(deserializer: D) -> Result<Vec<AttributeSpec>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: JsonValue = Deserialize::deserialize(deserializer)?;

    match value {
        JsonValue::Null => Ok(Vec::new()),
        JsonValue::String(s) if s.trim().is_empty() => Ok(Vec::new()),
        JsonValue::String(s) => serde_json::from_str(&s).map_err(|e| {
            serde::de::Error::custom(format!("Failed to parse attributes: {e}"))
        }),
        JsonValue::Array(a) => a
            .into_iter()
            .map(|v| {
                serde_json::from_value(v).map_err(|e| {
                    serde::de::Error::custom(format!("Failed to parse attribute: {e}"))
                })
            })
            .collect(),
        other => Err(serde::de::Error::custom(format!(
            "Expected a list of attributes, got {other}"
        ))),
    }
}
