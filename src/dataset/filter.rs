use serde::Deserialize;
use std::collections::{HashMap, HashSet};

use super::Row;

/// A `column == value` predicate on a dataset row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ColumnFilter {
    pub column: String,
    pub equals: String,
}

impl ColumnFilter {
    pub fn new(column: impl Into<String>, equals: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            equals: equals.into(),
        }
    }

    /// Numbers compare numerically (`0` matches `0.0`), anything else as trimmed text.
    /// A missing cell never matches.
    pub fn matches(&self, row: &Row<'_>) -> bool {
        let Some(cell) = row.get(&self.column) else {
            return false;
        };
        let cell = cell.trim();
        let expected = self.equals.trim();

        match (cell.parse::<f64>(), expected.parse::<f64>()) {
            (Ok(a), Ok(b)) => a == b,
            _ => cell == expected,
        }
    }

    /// True when every filter matches. An empty filter list keeps every row.
    pub fn all_match(filters: &[ColumnFilter], row: &Row<'_>) -> bool {
        filters.iter().all(|f| f.matches(row))
    }
}

/// Sanitized filenames that appear on more than one of the given rows.
pub fn duplicate_names<'a, I>(names: I) -> HashSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&'a str, usize> = HashMap::new();
    for name in names {
        *counts.entry(name).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(name, _)| name.to_string())
        .collect()
}
