//! Operator module: column-level comparison tests and their in-memory
//! evaluation.
//!
//! Every pattern-based operator compiles its in-memory matcher once, at
//! construction, so filtering many records never recompiles a pattern.

use crate::downgrade::escape_like;
use crate::types::{ComparisonResult, Value};
use crate::Result;
use regex::{Regex, RegexBuilder};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// The kind of an [`Operator`], without its operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OperatorKind {
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    CaseInsensitiveEquals,
    Like,
    NotLike,
    CaseInsensitiveLike,
    NativeRegex,
}

impl OperatorKind {
    pub const ALL: [OperatorKind; 9] = [
        OperatorKind::GreaterThan,
        OperatorKind::LessThan,
        OperatorKind::GreaterOrEqual,
        OperatorKind::LessOrEqual,
        OperatorKind::CaseInsensitiveEquals,
        OperatorKind::Like,
        OperatorKind::NotLike,
        OperatorKind::CaseInsensitiveLike,
        OperatorKind::NativeRegex,
    ];
}

/// A `LIKE` pattern and the anchored regex that matches the same strings.
#[derive(Clone)]
pub struct LikePattern {
    pattern: String,
    matcher: Regex,
}

impl LikePattern {
    pub fn new(pattern: impl Into<String>, case_insensitive: bool) -> Result<Self> {
        let pattern = pattern.into();
        let matcher = RegexBuilder::new(&like_to_regex(&pattern))
            .case_insensitive(case_insensitive)
            .dot_matches_new_line(true)
            .build()?;
        Ok(Self { pattern, matcher })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.matcher.is_match(text)
    }
}

impl PartialEq for LikePattern {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.matcher.as_str() == other.matcher.as_str()
    }
}

impl fmt::Debug for LikePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LikePattern").field(&self.pattern).finish()
    }
}

impl Serialize for LikePattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.pattern)
    }
}

/// A regular expression kept both as source text, for compilation, and as a
/// compiled matcher, for in-memory evaluation.
#[derive(Clone)]
pub struct RegexPattern {
    source: String,
    case_insensitive: bool,
    matcher: Regex,
}

impl RegexPattern {
    pub fn new(source: impl Into<String>, case_insensitive: bool) -> Result<Self> {
        let source = source.into();
        let matcher = RegexBuilder::new(&source)
            .case_insensitive(case_insensitive)
            .build()?;
        Ok(Self {
            source,
            case_insensitive,
            matcher,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.matcher.is_match(text)
    }
}

impl PartialEq for RegexPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.case_insensitive == other.case_insensitive
    }
}

impl fmt::Debug for RegexPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = if self.case_insensitive { "i" } else { "" };
        write!(f, "/{}/{}", self.source, flags)
    }
}

impl Serialize for RegexPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{self:?}"))
    }
}

/// One column-level comparison. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[non_exhaustive]
pub enum Operator {
    GreaterThan(Value),
    LessThan(Value),
    GreaterOrEqual(Value),
    LessOrEqual(Value),
    CaseInsensitiveEquals(Value),
    Like(LikePattern),
    NotLike(LikePattern),
    CaseInsensitiveLike(LikePattern),
    NativeRegex(RegexPattern),
}

impl Operator {
    pub fn gt(value: impl Into<Value>) -> Self {
        Operator::GreaterThan(value.into())
    }

    pub fn lt(value: impl Into<Value>) -> Self {
        Operator::LessThan(value.into())
    }

    pub fn gte(value: impl Into<Value>) -> Self {
        Operator::GreaterOrEqual(value.into())
    }

    pub fn lte(value: impl Into<Value>) -> Self {
        Operator::LessOrEqual(value.into())
    }

    pub fn insensitive(value: impl Into<Value>) -> Self {
        Operator::CaseInsensitiveEquals(value.into())
    }

    /// Case-sensitive `LIKE` with `%` and `_` wildcards.
    pub fn like(pattern: impl Into<String>) -> Result<Self> {
        Ok(Operator::Like(LikePattern::new(pattern, false)?))
    }

    pub fn not_like(pattern: impl Into<String>) -> Result<Self> {
        Ok(Operator::NotLike(LikePattern::new(pattern, false)?))
    }

    pub fn ilike(pattern: impl Into<String>) -> Result<Self> {
        Ok(Operator::CaseInsensitiveLike(LikePattern::new(pattern, true)?))
    }

    pub fn starts_with(prefix: &str) -> Result<Self> {
        Self::like(format!("{}%", escape_like(prefix)))
    }

    pub fn ends_with(suffix: &str) -> Result<Self> {
        Self::like(format!("%{}", escape_like(suffix)))
    }

    pub fn contains(needle: &str) -> Result<Self> {
        Self::like(format!("%{}%", escape_like(needle)))
    }

    pub fn regex(source: impl Into<String>) -> Result<Self> {
        Ok(Operator::NativeRegex(RegexPattern::new(source, false)?))
    }

    pub fn iregex(source: impl Into<String>) -> Result<Self> {
        Ok(Operator::NativeRegex(RegexPattern::new(source, true)?))
    }

    pub fn kind(&self) -> OperatorKind {
        match self {
            Operator::GreaterThan(_) => OperatorKind::GreaterThan,
            Operator::LessThan(_) => OperatorKind::LessThan,
            Operator::GreaterOrEqual(_) => OperatorKind::GreaterOrEqual,
            Operator::LessOrEqual(_) => OperatorKind::LessOrEqual,
            Operator::CaseInsensitiveEquals(_) => OperatorKind::CaseInsensitiveEquals,
            Operator::Like(_) => OperatorKind::Like,
            Operator::NotLike(_) => OperatorKind::NotLike,
            Operator::CaseInsensitiveLike(_) => OperatorKind::CaseInsensitiveLike,
            Operator::NativeRegex(_) => OperatorKind::NativeRegex,
        }
    }

    /// Test `actual` against this operator.
    ///
    /// A null on either side yields `Unknown`, with one exception:
    /// case-insensitive equality of two nulls is `True` (`NULL IS NULL`).
    pub fn evaluate(&self, actual: &Value) -> ComparisonResult {
        match self {
            Operator::GreaterThan(expr) => cmp_ord(actual, expr, Ordering::is_gt),
            Operator::LessThan(expr) => cmp_ord(actual, expr, Ordering::is_lt),
            Operator::GreaterOrEqual(expr) => cmp_ord(actual, expr, Ordering::is_ge),
            Operator::LessOrEqual(expr) => cmp_ord(actual, expr, Ordering::is_le),
            Operator::CaseInsensitiveEquals(expr) => match (actual, expr) {
                (Value::Null, Value::Null) => ComparisonResult::True,
                (Value::Null, _) | (_, Value::Null) => ComparisonResult::Unknown,
                (a, e) => a.equals_ignore_case(e).into(),
            },
            Operator::Like(p) | Operator::CaseInsensitiveLike(p) => {
                cmp_text(actual, |s| p.is_match(s))
            }
            Operator::NotLike(p) => !cmp_text(actual, |s| p.is_match(s)),
            Operator::NativeRegex(r) => cmp_text(actual, |s| r.is_match(s)),
        }
    }
}

// Helper for ordered comparisons; incomparable kinds have no truth value
fn cmp_ord<F>(actual: &Value, expr: &Value, test: F) -> ComparisonResult
where
    F: Fn(Ordering) -> bool,
{
    if actual.is_null() || expr.is_null() {
        return ComparisonResult::Unknown;
    }
    actual.compare(expr).map(test).into()
}

// Helper for pattern matches; non-string values match on their text form
fn cmp_text<F>(actual: &Value, test: F) -> ComparisonResult
where
    F: Fn(&str) -> bool,
{
    match actual {
        Value::Null => ComparisonResult::Unknown,
        Value::Str(s) => test(s).into(),
        other => test(&other.to_string()).into(),
    }
}

/// Translate a `LIKE` pattern into an anchored regex.
fn like_to_regex(pattern: &str) -> String {
    let mut result = String::with_capacity(pattern.len() * 2 + 2);
    result.push('^');
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '%' => result.push_str(".*"),
            '_' => result.push('.'),
            '\\' => match chars.next() {
                Some(next) => result.push_str(&regex::escape(&next.to_string())),
                None => result.push_str(r"\\"),
            },
            _ => result.push_str(&regex::escape(&c.to_string())),
        }
    }
    result.push('$');
    result
}
