//! Fragment module: the query shapes a condition compiles to.
//!
//! A fragment only names a shape and its operands. Rendering dialect syntax
//! is left to the query compiler that consumes it.

use crate::types::{Value, ValueRange};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to a column, optionally qualified by its table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    pub table: Option<String>,
    pub name: String,
}

impl ColumnRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            table: None,
            name: name.into(),
        }
    }

    pub fn qualified(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            name: name.into(),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{}.{}", table, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    Gt,
    Lt,
    Gte,
    Lte,
}

impl CompareOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::Gte => ">=",
            CompareOp::Lte => "<=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Fragment {
    /// Constant false; never selects a row.
    Never,
    IsNull {
        column: ColumnRef,
    },
    Compare {
        column: ColumnRef,
        op: CompareOp,
        value: Value,
    },
    /// `LOWER(column) = value`, with `value` already lower-cased.
    LowerEquals {
        column: ColumnRef,
        value: String,
    },
    /// Wildcard match with `%`/`_` wildcards and `\` escapes.
    Match {
        column: ColumnRef,
        pattern: String,
        case_sensitive: bool,
        negated: bool,
    },
    Regex {
        column: ColumnRef,
        source: String,
        case_sensitive: bool,
    },
    /// Membership, optionally also admitting null.
    In {
        column: ColumnRef,
        values: Vec<Value>,
        or_null: bool,
    },
    Range {
        column: ColumnRef,
        range: ValueRange,
    },
}

impl Fragment {
    pub fn column(&self) -> Option<&ColumnRef> {
        match self {
            Fragment::Never => None,
            Fragment::IsNull { column }
            | Fragment::Compare { column, .. }
            | Fragment::LowerEquals { column, .. }
            | Fragment::Match { column, .. }
            | Fragment::Regex { column, .. }
            | Fragment::In { column, .. }
            | Fragment::Range { column, .. } => Some(column),
        }
    }
}
