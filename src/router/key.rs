//! Partitioning key in a query.
//!
//! This isn't a SQL parser. We look for the first `column = literal`
//! predicate on one of the key columns and take its value. Anything
//! more involved (`IN` lists, expressions, `literal = column`) isn't
//! recognized.

use std::ops::Range;

use regex::{Regex, RegexBuilder};

use crate::driver::Error;

/// Key column and the value it's compared to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMatch {
    /// Column, as declared in the connection string.
    pub column: String,
    /// Literal value with quotes stripped.
    pub value: String,
    /// Where the predicate is in the query text.
    pub span: Range<usize>,
}

/// Result of scanning a query for a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scan {
    Matched(KeyMatch),
    NotFound,
}

impl Scan {
    pub fn matched(self) -> Option<KeyMatch> {
        match self {
            Scan::Matched(key) => Some(key),
            Scan::NotFound => None,
        }
    }
}

/// Searches queries for equality predicates on key columns.
#[derive(Debug, Clone)]
pub struct KeyScanner {
    keys: Vec<(String, Regex)>,
}

impl KeyScanner {
    /// Compile a pattern for each key column. Order is priority.
    pub fn new(keys: &[String]) -> Result<Self, Error> {
        let keys = keys
            .iter()
            .map(|key| -> Result<_, Error> { Ok((key.clone(), Self::pattern(key)?)) })
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(Self { keys })
    }

    fn pattern(column: &str) -> Result<Regex, regex::Error> {
        // Column, optionally qualified, not part of a longer identifier,
        // followed by `=` and a quoted string or a number. Quotes inside
        // strings are escaped by doubling them.
        RegexBuilder::new(&format!(
            r#"(?:^|[^\w$])({})\s*=\s*(?:'((?:[^']|'')*)'|"((?:[^"]|"")*)"|([-+]?[0-9]+(?:\.[0-9]+)?)\b)"#,
            regex::escape(column)
        ))
        .case_insensitive(true)
        .build()
    }

    /// Key columns in priority order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|(key, _)| key.as_str())
    }

    /// Find the key to route the query on.
    ///
    /// Keys are tried in priority order; for each key the first predicate
    /// with a non-empty value wins.
    pub fn scan(&self, sql: &str) -> Scan {
        for (column, pattern) in &self.keys {
            for cap in pattern.captures_iter(sql) {
                let value = match (cap.get(2), cap.get(3), cap.get(4)) {
                    (Some(single), _, _) => single.as_str().replace("''", "'"),
                    (_, Some(double), _) => double.as_str().replace(r#""""#, r#"""#),
                    (_, _, Some(number)) => number.as_str().to_string(),
                    _ => continue,
                };
                let (Some(column_match), Some(predicate)) = (cap.get(1), cap.get(0)) else {
                    continue;
                };

                if value.is_empty() {
                    continue;
                }

                return Scan::Matched(KeyMatch {
                    column: column.clone(),
                    value,
                    span: column_match.start()..predicate.end(),
                });
            }
        }

        Scan::NotFound
    }
}
