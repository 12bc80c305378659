use regex::{Regex, RegexBuilder};
use serde::Deserialize;

use super::{Error, FilterSet};

/// Options for the regular expression engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct RegexpConfig {
    /// Upper bound in bytes for each compiled program. The engine default
    /// applies when unset.
    pub size_limit: Option<usize>,
}

/// Matches inputs containing a match for any of the configured expressions.
///
/// Search is unanchored; patterns anchor themselves with `^` and `$`.
#[derive(Clone, Debug)]
pub struct RegexpFilterSet {
    regexes: Vec<Regex>,
}

impl RegexpFilterSet {
    pub fn new(patterns: &[String], config: RegexpConfig) -> Result<Self, Error> {
        let regexes = patterns
            .iter()
            .map(|pattern| {
                let mut builder = RegexBuilder::new(pattern);
                if let Some(limit) = config.size_limit {
                    builder.size_limit(limit);
                }
                builder.build().map_err(|source| Error::InvalidRegexp {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RegexpFilterSet { regexes })
    }
}

impl FilterSet for RegexpFilterSet {
    fn matches(&self, input: &str) -> bool {
        self.regexes.iter().any(|regex| regex.is_match(input))
    }
}
