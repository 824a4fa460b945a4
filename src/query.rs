//! Query-host boundary types
//!
//! The query engine host hands each table invocation a set of equality
//! qualifiers, an optional row limit, and a sink to stream rows into.
//! These types mirror that contract without depending on any particular
//! host framework.

use serde_json::Value;
use std::collections::HashMap;

/// A single result row: a JSON object keyed by column name.
pub type Row = Value;

/// Equality filters extracted from the query's constraints.
#[derive(Debug, Clone, Default)]
pub struct Qualifiers {
    values: HashMap<String, String>,
}

impl Qualifiers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, mostly for tests and host glue.
    pub fn with(mut self, column: &str, value: &str) -> Self {
        self.set(column, value);
        self
    }

    pub fn set(&mut self, column: &str, value: &str) {
        self.values.insert(column.to_string(), value.to_string());
    }

    /// The equality value for a column, or "" when the query did not
    /// constrain it.
    pub fn equals(&self, column: &str) -> &str {
        self.values.get(column).map(|s| s.as_str()).unwrap_or("")
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(|s| s.as_str())
    }
}

/// Per-invocation context supplied by the host.
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    pub quals: Qualifiers,
    /// Maximum number of rows the host needs, or `None` for unbounded.
    pub limit: Option<u64>,
}

impl QueryContext {
    pub fn new(quals: Qualifiers, limit: Option<u64>) -> Self {
        Self { quals, limit }
    }

    pub fn budget(&self) -> RowBudget {
        RowBudget::from_limit(self.limit)
    }
}

/// Receives rows as they are produced. Assumed non-blocking; invoked inline
/// with iteration.
pub trait RowSink {
    fn emit(&mut self, row: Row);
}

impl RowSink for Vec<Row> {
    fn emit(&mut self, row: Row) {
        self.push(row);
    }
}

/// Remaining-row counter, the sole cancellation signal for listings.
///
/// Decremented once per emitted row; checked at page and record boundaries
/// only, never preemptively mid-call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowBudget {
    remaining: Option<u64>,
}

impl RowBudget {
    pub fn unbounded() -> Self {
        Self { remaining: None }
    }

    pub fn limited(rows: u64) -> Self {
        Self {
            remaining: Some(rows),
        }
    }

    pub fn from_limit(limit: Option<u64>) -> Self {
        Self { remaining: limit }
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    /// Account for one emitted row.
    pub fn record_emitted(&mut self) {
        if let Some(n) = self.remaining.as_mut() {
            *n = n.saturating_sub(1);
        }
    }

    /// Cap a requested page size so a page never fetches more rows than the
    /// budget can still emit.
    pub fn cap_page_size(&self, page_size: u64) -> u64 {
        match self.remaining {
            Some(n) => page_size.min(n),
            None => page_size,
        }
    }

    pub fn remaining(&self) -> Option<u64> {
        self.remaining
    }
}
