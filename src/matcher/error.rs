use thiserror::Error;

use crate::filterset::{self, MATCH_TYPE_FIELD_NAME, MatchType};
use crate::value::{ValueType, normalize};

/// Failures building an [`super::AttributesMatcher`].
///
/// Compilation is all-or-nothing, so any of these aborts the whole matcher.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("can't have empty key in the list of attributes (position {position})")]
    InvalidCriterion { position: usize },
    #[error(
        "{}={} for {key:?} only supports {}, but found {found}",
        MATCH_TYPE_FIELD_NAME,
        MatchType::Regexp,
        ValueType::String
    )]
    UnsupportedValueType { key: String, found: ValueType },
    #[error("cannot convert value of attribute {key:?}: {source}")]
    ValueConversion {
        key: String,
        #[source]
        source: normalize::Error,
    },
    #[error("cannot compile pattern of attribute {key:?}: {source}")]
    PatternCompile {
        key: String,
        #[source]
        source: filterset::Error,
    },
}
