//! Types module: scalar values, ranges and the tri-valued comparison result.
//!
//! `Value` is what a record field holds and what an operator compares against.
//! `ComparisonResult` mirrors relational null semantics: a comparison that
//! touches a null has no truth value and is `Unknown`, never `False`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Bound, Not, Range, RangeFrom, RangeInclusive, RangeTo, RangeToInclusive};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Ordered comparison between two values of comparable kinds.
    ///
    /// Numbers compare across `Int`/`Float`, strings compare by byte order
    /// (so `"BIG" < "big"`), booleans compare `false < true`. Anything else,
    /// including `Null` on either side, has no ordering.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Float(b)) => cmp_int_float(*a, *b),
            (Value::Float(a), Value::Int(b)) => cmp_int_float(*b, *a).map(Ordering::reverse),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Str(a), Value::Str(b)) => Some(a.as_str().cmp(b.as_str())),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Equality as a filter sees it: numbers are equal across `Int`/`Float`,
    /// every other cross-kind pair is unequal.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(_), Value::Float(_)) | (Value::Float(_), Value::Int(_)) => {
                self.compare(other) == Some(Ordering::Equal)
            }
            _ => self == other,
        }
    }

    /// Equality after case-folding both sides when both are strings.
    pub fn equals_ignore_case(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => a.to_lowercase() == b.to_lowercase(),
            _ => self.equals(other),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

// Exact for every i64, including magnitudes a f64 cannot hold
fn cmp_int_float(int: i64, float: f64) -> Option<Ordering> {
    if float.is_nan() {
        return None;
    }
    let lower = i64::MIN as f64;
    if float >= -lower {
        return Some(Ordering::Less);
    }
    if float < lower {
        return Some(Ordering::Greater);
    }
    let whole = float.trunc();
    match int.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0f64.partial_cmp(&(float - whole)),
        ordering => Some(ordering),
    }
}

/// Outcome of comparing one field value against one condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonResult {
    True,
    False,
    /// The comparison involves a null and has no determinate truth value.
    Unknown,
}

impl ComparisonResult {
    /// Whether a record with this result is kept by a filter.
    ///
    /// `Unknown` never counts as a match, negated or not.
    pub fn satisfied(self, negate: bool) -> bool {
        !self.is_unknown() && (self == ComparisonResult::True) != negate
    }

    pub fn is_unknown(self) -> bool {
        self == ComparisonResult::Unknown
    }
}

/// Logical negation; `Unknown` stays `Unknown`.
impl Not for ComparisonResult {
    type Output = Self;

    fn not(self) -> Self {
        match self {
            ComparisonResult::True => ComparisonResult::False,
            ComparisonResult::False => ComparisonResult::True,
            ComparisonResult::Unknown => ComparisonResult::Unknown,
        }
    }
}

impl From<bool> for ComparisonResult {
    fn from(b: bool) -> Self {
        if b {
            ComparisonResult::True
        } else {
            ComparisonResult::False
        }
    }
}

impl From<Option<bool>> for ComparisonResult {
    fn from(b: Option<bool>) -> Self {
        b.map_or(ComparisonResult::Unknown, Into::into)
    }
}

/// A span of values with independently inclusive, exclusive or open ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub start: Bound<Value>,
    pub end: Bound<Value>,
}

impl ValueRange {
    pub fn new(start: Bound<Value>, end: Bound<Value>) -> Self {
        Self { start, end }
    }

    /// `start..=end`
    pub fn inclusive(start: impl Into<Value>, end: impl Into<Value>) -> Self {
        Self::new(Bound::Included(start.into()), Bound::Included(end.into()))
    }

    /// `start..end`
    pub fn exclusive(start: impl Into<Value>, end: impl Into<Value>) -> Self {
        Self::new(Bound::Included(start.into()), Bound::Excluded(end.into()))
    }

    pub fn at_least(start: impl Into<Value>) -> Self {
        Self::new(Bound::Included(start.into()), Bound::Unbounded)
    }

    pub fn at_most(end: impl Into<Value>) -> Self {
        Self::new(Bound::Unbounded, Bound::Included(end.into()))
    }

    /// Whether `value` lies inside the range. `None` when `value` cannot be
    /// ordered against one of the bounds.
    pub fn covers(&self, value: &Value) -> Option<bool> {
        let above_start = match &self.start {
            Bound::Included(s) => value.compare(s)? != Ordering::Less,
            Bound::Excluded(s) => value.compare(s)? == Ordering::Greater,
            Bound::Unbounded => true,
        };
        let below_end = match &self.end {
            Bound::Included(e) => value.compare(e)? != Ordering::Greater,
            Bound::Excluded(e) => value.compare(e)? == Ordering::Less,
            Bound::Unbounded => true,
        };
        Some(above_start && below_end)
    }
}

impl<V: Into<Value>> From<RangeInclusive<V>> for ValueRange {
    fn from(r: RangeInclusive<V>) -> Self {
        let (start, end) = r.into_inner();
        Self::inclusive(start, end)
    }
}

impl<V: Into<Value>> From<Range<V>> for ValueRange {
    fn from(r: Range<V>) -> Self {
        Self::exclusive(r.start, r.end)
    }
}

impl<V: Into<Value>> From<RangeFrom<V>> for ValueRange {
    fn from(r: RangeFrom<V>) -> Self {
        Self::at_least(r.start)
    }
}

impl<V: Into<Value>> From<RangeToInclusive<V>> for ValueRange {
    fn from(r: RangeToInclusive<V>) -> Self {
        Self::at_most(r.end)
    }
}

impl<V: Into<Value>> From<RangeTo<V>> for ValueRange {
    fn from(r: RangeTo<V>) -> Self {
        Self::new(Bound::Unbounded, Bound::Excluded(r.end.into()))
    }
}
