//! Pattern filter sets used by pattern-mode criteria.
//!
//! A filter set is compiled once from a list of patterns and then answers a
//! single question: does a given string match any of them. The match type
//! selected in [`Config`] decides which engine builds the set.

pub mod regexp;
pub mod strict;

use std::fmt::Display;
use std::sync::Arc;

use serde::Deserialize;

pub use regexp::{RegexpConfig, RegexpFilterSet};
pub use strict::StrictFilterSet;

/// Name of the configuration field holding the match type.
pub const MATCH_TYPE_FIELD_NAME: &str = "match_type";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    #[default]
    Strict,
    Regexp,
}

impl AsRef<str> for MatchType {
    fn as_ref(&self) -> &str {
        match self {
            MatchType::Strict => "strict",
            MatchType::Regexp => "regexp",
        }
    }
}

impl Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Options shared by every filter set built for one matcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub match_type: MatchType,
    pub regexp: Option<RegexpConfig>,
}

impl Config {
    #[must_use]
    pub fn new(match_type: MatchType) -> Self {
        Config {
            match_type,
            regexp: None,
        }
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum Error {
    #[error("invalid regexp pattern {pattern:?}: {source}")]
    InvalidRegexp {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub trait FilterSet: Send + Sync + std::fmt::Debug {
    /// Returns `true` when `input` matches at least one pattern of the set.
    fn matches(&self, input: &str) -> bool;
}

/// Builds a [`FilterSet`] from a list of patterns.
pub trait FilterSetCompiler {
    fn compile(&self, patterns: &[String], config: &Config) -> Result<Arc<dyn FilterSet>, Error>;
}

/// Compiler dispatching on [`Config::match_type`].
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultCompiler;

impl FilterSetCompiler for DefaultCompiler {
    fn compile(&self, patterns: &[String], config: &Config) -> Result<Arc<dyn FilterSet>, Error> {
        match config.match_type {
            MatchType::Strict => Ok(Arc::new(StrictFilterSet::new(patterns))),
            MatchType::Regexp => Ok(Arc::new(RegexpFilterSet::new(
                patterns,
                config.regexp.unwrap_or_default(),
            )?)),
        }
    }
}
