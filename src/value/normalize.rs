//! Conversion of loosely typed configuration values into [`Value`].

use serde_json::Value as JsonValue;

use super::Value;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("null is not a supported attribute value")]
    Null,
    #[error("integer {0} does not fit in a signed 64-bit attribute value")]
    IntegerOverflow(String),
    #[error("unsupported value type \"{0}\"")]
    UnsupportedType(&'static str),
}

/// Turns a raw configured value into a typed attribute value.
pub trait ValueNormalizer {
    fn normalize(&self, raw: &JsonValue) -> Result<Value, Error>;
}

/// Normalizer for values read from YAML or JSON configuration.
///
/// Objects are rejected: criteria compare against scalar or array values only.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonNormalizer;

impl ValueNormalizer for JsonNormalizer {
    fn normalize(&self, raw: &JsonValue) -> Result<Value, Error> {
        match raw {
            JsonValue::String(s) => Ok(Value::String(s.clone())),
            JsonValue::Bool(b) => Ok(Value::Bool(*b)),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Int(i))
                } else if n.is_u64() {
                    Err(Error::IntegerOverflow(n.to_string()))
                } else {
                    n.as_f64()
                        .map(Value::Double)
                        .ok_or(Error::UnsupportedType("number"))
                }
            }
            JsonValue::Array(items) => items
                .iter()
                .map(|item| self.normalize(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            JsonValue::Null => Err(Error::Null),
            JsonValue::Object(_) => Err(Error::UnsupportedType("map")),
        }
    }
}
