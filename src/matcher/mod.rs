//! Compiled attribute matching.
//!
//! An [`AttributesMatcher`] is built once from configured criteria and then
//! evaluated against the attributes of every record flowing through a filter
//! stage. A record matches when every criterion is satisfied:
//!
//! - a criterion without a value only requires the key to be present,
//! - with `match_type: strict` the attribute must equal the configured value,
//!   variant included,
//! - with `match_type: regexp` the attribute, rendered as a string, must match
//!   the configured pattern.
//!
//! The matcher is immutable once built and can be shared across threads.

mod error;

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::filterset::{self, DefaultCompiler, FilterSet, FilterSetCompiler, MatchType};
use crate::value::Value;
use crate::value::normalize::{JsonNormalizer, ValueNormalizer};

pub use error::Error;

/// One configured criterion, before compilation.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AttributeSpec {
    pub key: String,
    #[serde(default)]
    pub value: Option<JsonValue>,
}

impl AttributeSpec {
    #[must_use]
    pub fn key_only(key: impl Into<String>) -> Self {
        AttributeSpec {
            key: key.into(),
            value: None,
        }
    }

    #[must_use]
    pub fn with_value(key: impl Into<String>, value: JsonValue) -> Self {
        AttributeSpec {
            key: key.into(),
            value: Some(value),
        }
    }
}

/// Read access to the attributes of a record.
pub trait AttributeMap {
    fn get(&self, key: &str) -> Option<&Value>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: BuildHasher> AttributeMap for HashMap<String, Value, S> {
    fn get(&self, key: &str) -> Option<&Value> {
        HashMap::get(self, key)
    }

    fn len(&self) -> usize {
        HashMap::len(self)
    }
}

impl AttributeMap for BTreeMap<String, Value> {
    fn get(&self, key: &str) -> Option<&Value> {
        BTreeMap::get(self, key)
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }
}

#[derive(Clone, Debug)]
pub enum MatchMode {
    KeyOnly,
    ExactValue(Value),
    Pattern(Arc<dyn FilterSet>),
}

/// A compiled criterion: a key and how its value is checked.
#[derive(Clone, Debug)]
pub struct AttributeMatcher {
    key: String,
    mode: MatchMode,
}

impl AttributeMatcher {
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn mode(&self) -> &MatchMode {
        &self.mode
    }

    pub fn matches<A: AttributeMap + ?Sized>(&self, attrs: &A) -> bool {
        let Some(value) = attrs.get(&self.key) else {
            return false;
        };

        match &self.mode {
            MatchMode::KeyOnly => true,
            // Values without a string form fail this criterion only
            MatchMode::Pattern(filter) => value
                .coerce_to_string()
                .is_ok_and(|s| filter.matches(&s)),
            MatchMode::ExactValue(expected) => value == expected,
        }
    }
}

/// Ordered list of compiled criteria, all of which must pass.
#[derive(Clone, Debug, Default)]
pub struct AttributesMatcher {
    criteria: Vec<AttributeMatcher>,
}

impl AttributesMatcher {
    /// Compiles `attributes` with the JSON value normalizer and the default
    /// filter set compiler.
    pub fn new(config: &filterset::Config, attributes: &[AttributeSpec]) -> Result<Self, Error> {
        Self::with_collaborators(&JsonNormalizer, &DefaultCompiler, config, attributes)
    }

    /// Compiles `attributes` in order. The first invalid criterion aborts
    /// compilation and no matcher is returned.
    pub fn with_collaborators<N, C>(
        normalizer: &N,
        compiler: &C,
        config: &filterset::Config,
        attributes: &[AttributeSpec],
    ) -> Result<Self, Error>
    where
        N: ValueNormalizer + ?Sized,
        C: FilterSetCompiler + ?Sized,
    {
        let criteria = attributes
            .iter()
            .enumerate()
            .map(|(position, attribute)| {
                compile_attribute(normalizer, compiler, config, position, attribute)
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "ATTRIBUTES MATCHER | Compiled {} criteria with match_type={}",
            criteria.len(),
            config.match_type
        );

        Ok(AttributesMatcher { criteria })
    }

    /// Evaluates the criteria against `attrs`.
    ///
    /// A matcher without criteria accepts every record. Otherwise a record
    /// without attributes never matches, and evaluation stops at the first
    /// failing criterion.
    pub fn matches<A: AttributeMap + ?Sized>(&self, attrs: &A) -> bool {
        if self.criteria.is_empty() {
            return true;
        }

        if attrs.is_empty() {
            return false;
        }

        self.criteria.iter().all(|criterion| criterion.matches(attrs))
    }

    #[must_use]
    pub fn criteria(&self) -> &[AttributeMatcher] {
        &self.criteria
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}

fn compile_attribute<N, C>(
    normalizer: &N,
    compiler: &C,
    config: &filterset::Config,
    position: usize,
    attribute: &AttributeSpec,
) -> Result<AttributeMatcher, Error>
where
    N: ValueNormalizer + ?Sized,
    C: FilterSetCompiler + ?Sized,
{
    if attribute.key.is_empty() {
        return Err(Error::InvalidCriterion { position });
    }

    let Some(raw) = &attribute.value else {
        return Ok(AttributeMatcher {
            key: attribute.key.clone(),
            mode: MatchMode::KeyOnly,
        });
    };

    let value = normalizer
        .normalize(raw)
        .map_err(|source| Error::ValueConversion {
            key: attribute.key.clone(),
            source,
        })?;

    let mode = if config.match_type == MatchType::Regexp {
        let pattern = match value {
            Value::String(pattern) => pattern,
            other => {
                return Err(Error::UnsupportedValueType {
                    key: attribute.key.clone(),
                    found: other.value_type(),
                });
            }
        };

        let filter = compiler
            .compile(&[pattern], config)
            .map_err(|source| Error::PatternCompile {
                key: attribute.key.clone(),
                source,
            })?;
        MatchMode::Pattern(filter)
    } else {
        MatchMode::ExactValue(value)
    };

    Ok(AttributeMatcher {
        key: attribute.key.clone(),
        mode,
    })
}
