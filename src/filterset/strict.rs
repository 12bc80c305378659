use std::collections::HashSet;

use super::FilterSet;

/// Matches inputs equal to one of the configured strings.
#[derive(Clone, Debug, Default)]
pub struct StrictFilterSet {
    filters: HashSet<String>,
}

impl StrictFilterSet {
    #[must_use]
    pub fn new(patterns: &[String]) -> Self {
        StrictFilterSet {
            filters: patterns.iter().cloned().collect(),
        }
    }
}

impl FilterSet for StrictFilterSet {
    fn matches(&self, input: &str) -> bool {
        self.filters.contains(input)
    }
}
