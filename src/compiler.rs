//! Compiler module: choose the fragment shape for each operator and
//! condition, given what the backend can do.
//!
//! Most operators map to exactly one shape. Case-insensitive equality and
//! native regexes depend on [`Settings`]: the first picks between a wildcard
//! literal, a `LOWER()` comparison and plain equality, the second tries a
//! downgrade to equality or a wildcard match before falling back to a native
//! regex.

use crate::condition::{Condition, Conditions};
use crate::downgrade::{convert_regex, escape_like, unescape_like, Mode};
use crate::fragment::{ColumnRef, CompareOp, Fragment};
use crate::operator::Operator;
use crate::settings::Settings;
use crate::types::Value;
use crate::{Error, Result};

/// Compile one operator against `column`.
pub fn compile(operator: &Operator, column: &ColumnRef, settings: &Settings) -> Result<Fragment> {
    FragmentCompiler::new(*settings).compile(operator, column)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FragmentCompiler {
    settings: Settings,
}

impl FragmentCompiler {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn compile(&self, operator: &Operator, column: &ColumnRef) -> Result<Fragment> {
        let column = column.clone();
        let fragment = match operator {
            Operator::GreaterThan(expr) => ordered(column, CompareOp::Gt, expr),
            Operator::LessThan(expr) => ordered(column, CompareOp::Lt, expr),
            Operator::GreaterOrEqual(expr) => ordered(column, CompareOp::Gte, expr),
            Operator::LessOrEqual(expr) => ordered(column, CompareOp::Lte, expr),
            Operator::CaseInsensitiveEquals(expr) => match expr {
                Value::Null => Fragment::IsNull { column },
                Value::Str(s) => self.insensitive_equality(column, &escape_like(s)),
                other => Fragment::Compare {
                    column,
                    op: CompareOp::Eq,
                    value: other.clone(),
                },
            },
            Operator::Like(p) => wildcard(column, p.pattern(), true, false),
            Operator::NotLike(p) => wildcard(column, p.pattern(), true, true),
            Operator::CaseInsensitiveLike(p) => wildcard(column, p.pattern(), false, false),
            Operator::NativeRegex(r) => {
                return self.regex(column, r.source(), r.case_insensitive());
            }
        };
        Ok(fragment)
    }

    /// Compile any condition, operator or not.
    pub fn compile_condition(&self, condition: &Condition, column: &ColumnRef) -> Result<Fragment> {
        let column = column.clone();
        let fragment = match condition {
            Condition::Null => Fragment::IsNull { column },
            Condition::Equals(Value::Null) => Fragment::IsNull { column },
            Condition::Equals(value) => Fragment::Compare {
                column,
                op: CompareOp::Eq,
                value: value.clone(),
            },
            Condition::In(values) => Fragment::In {
                column,
                values: values.iter().filter(|v| !v.is_null()).cloned().collect(),
                or_null: values.iter().any(Value::is_null),
            },
            Condition::Range(range) => Fragment::Range {
                column,
                range: range.clone(),
            },
            Condition::Operator(op) => return self.compile(op, &column),
        };
        Ok(fragment)
    }

    /// Compile every condition in order, one fragment per field.
    pub fn compile_all(&self, conditions: &Conditions) -> Result<Vec<Fragment>> {
        conditions
            .iter()
            .map(|(field, condition)| self.compile_condition(condition, &ColumnRef::new(field)))
            .collect()
    }

    fn regex(&self, column: ColumnRef, source: &str, case_insensitive: bool) -> Result<Fragment> {
        let conversion = convert_regex(source, case_insensitive);
        tracing::trace!(
            column = %column,
            mode = %conversion.mode,
            case_sensitive = conversion.case_sensitive,
            "regex downgrade"
        );
        let fragment = match conversion.mode {
            Mode::Equals if !conversion.case_sensitive => {
                self.insensitive_equality(column, &conversion.source)
            }
            Mode::Equals => Fragment::Compare {
                column,
                op: CompareOp::Eq,
                value: Value::Str(conversion.literal()),
            },
            Mode::Like => wildcard(column, &conversion.source, conversion.case_sensitive, false),
            Mode::Native if self.settings.use_regex => Fragment::Regex {
                column,
                source: conversion.source,
                case_sensitive: conversion.case_sensitive,
            },
            Mode::Native => {
                return Err(Error::Unsupported {
                    column: column.to_string(),
                    pattern: conversion.source,
                });
            }
        };
        Ok(fragment)
    }

    /// `escaped` is a wildcard-free pattern: `%`, `_` and `\` are escaped.
    fn insensitive_equality(&self, column: ColumnRef, escaped: &str) -> Fragment {
        if self.settings.use_like_for_compare {
            wildcard(column, escaped, false, false)
        } else if self.settings.sensitive_compare {
            Fragment::LowerEquals {
                column,
                value: unescape_like(escaped).to_lowercase(),
            }
        } else {
            // equality already ignores case on this backend
            Fragment::Compare {
                column,
                op: CompareOp::Eq,
                value: Value::Str(unescape_like(escaped)),
            }
        }
    }
}

// A comparison against null is never true in a filter
fn ordered(column: ColumnRef, op: CompareOp, expr: &Value) -> Fragment {
    if expr.is_null() {
        Fragment::Never
    } else {
        Fragment::Compare {
            column,
            op,
            value: expr.clone(),
        }
    }
}

fn wildcard(column: ColumnRef, pattern: &str, case_sensitive: bool, negated: bool) -> Fragment {
    Fragment::Match {
        column,
        pattern: pattern.to_string(),
        case_sensitive,
        negated,
    }
}
