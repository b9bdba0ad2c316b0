//! Condition module: what a single field is tested against, and the ordered
//! set of field conditions a filter applies.

use crate::operator::{Operator, RegexPattern};
use crate::types::{ComparisonResult, Value, ValueRange};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[non_exhaustive]
pub enum Condition {
    /// Plain equality.
    Equals(Value),
    /// `IS NULL`.
    Null,
    /// Membership; a `Value::Null` element also admits absent values.
    In(Vec<Value>),
    Range(ValueRange),
    Operator(Operator),
}

impl Condition {
    /// Test `actual` against this condition.
    pub fn evaluate(&self, actual: &Value) -> ComparisonResult {
        match self {
            Condition::Null => actual.is_null().into(),
            Condition::Equals(expected) => match (actual, expected) {
                (_, Value::Null) => actual.is_null().into(),
                (Value::Null, _) => ComparisonResult::Unknown,
                (a, e) => a.equals(e).into(),
            },
            Condition::In(values) => {
                if actual.is_null() {
                    if values.iter().any(Value::is_null) {
                        ComparisonResult::True
                    } else {
                        ComparisonResult::Unknown
                    }
                } else {
                    values.iter().any(|v| actual.equals(v)).into()
                }
            }
            Condition::Range(range) => {
                if actual.is_null() {
                    ComparisonResult::Unknown
                } else {
                    range.covers(actual).into()
                }
            }
            Condition::Operator(op) => op.evaluate(actual),
        }
    }
}

impl From<Operator> for Condition {
    fn from(op: Operator) -> Self {
        Condition::Operator(op)
    }
}

/// A regex literal is tested the same way as the native regex operator.
impl From<RegexPattern> for Condition {
    fn from(pattern: RegexPattern) -> Self {
        Condition::Operator(Operator::NativeRegex(pattern))
    }
}

impl From<ValueRange> for Condition {
    fn from(range: ValueRange) -> Self {
        Condition::Range(range)
    }
}

impl From<Value> for Condition {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Condition::Null,
            other => Condition::Equals(other),
        }
    }
}

impl From<&str> for Condition {
    fn from(s: &str) -> Self {
        Condition::Equals(s.into())
    }
}

impl From<i64> for Condition {
    fn from(i: i64) -> Self {
        Condition::Equals(i.into())
    }
}

impl From<i32> for Condition {
    fn from(i: i32) -> Self {
        Condition::Equals(i.into())
    }
}

impl<V: Into<Value>> From<Vec<V>> for Condition {
    fn from(values: Vec<V>) -> Self {
        Condition::In(values.into_iter().map(Into::into).collect())
    }
}

/// Field conditions in insertion order. Setting a field twice replaces the
/// earlier condition in place, so compiled output stays reproducible.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Conditions {
    entries: Vec<(String, Condition)>,
}

impl Conditions {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn with(mut self, field: impl Into<String>, condition: impl Into<Condition>) -> Self {
        self.insert(field, condition);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, condition: impl Into<Condition>) {
        let field = field.into();
        let condition = condition.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = condition,
            None => self.entries.push((field, condition)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Condition> {
        self.entries.iter().find(|(name, _)| name == field).map(|(_, c)| c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Condition)> {
        self.entries.iter().map(|(name, c)| (name.as_str(), c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, C: Into<Condition>> FromIterator<(K, C)> for Conditions {
    fn from_iter<I: IntoIterator<Item = (K, C)>>(iter: I) -> Self {
        let mut conditions = Conditions::new();
        for (field, condition) in iter {
            conditions.insert(field, condition);
        }
        conditions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equals() {
        let c = Condition::from("big");
        assert_eq!(c.evaluate(&Value::from("big")), ComparisonResult::True);
        assert_eq!(c.evaluate(&Value::from("BIG")), ComparisonResult::False);
        assert_eq!(c.evaluate(&Value::Null), ComparisonResult::Unknown);
    }

    #[test]
    fn test_null_is_an_is_null_test() {
        let c = Condition::from(Value::Null);
        assert_eq!(c, Condition::Null);
        assert_eq!(c.evaluate(&Value::Null), ComparisonResult::True);
        assert_eq!(c.evaluate(&Value::Int(1)), ComparisonResult::False);
    }

    #[test]
    fn test_list_with_null_admits_null() {
        let c = Condition::In(vec![Value::from("big"), Value::Null]);
        assert_eq!(c.evaluate(&Value::Null), ComparisonResult::True);
        assert_eq!(c.evaluate(&Value::from("big")), ComparisonResult::True);
        assert_eq!(c.evaluate(&Value::from("small")), ComparisonResult::False);
    }

    #[test]
    fn test_list_without_null() {
        let c = Condition::from(vec!["big", "BIG"]);
        assert_eq!(c.evaluate(&Value::Null), ComparisonResult::Unknown);
        assert_eq!(c.evaluate(&Value::from("BIG")), ComparisonResult::True);
    }

    #[test]
    fn test_range() {
        let c = Condition::from(ValueRange::from(5..100));
        assert_eq!(c.evaluate(&Value::Int(10)), ComparisonResult::True);
        assert_eq!(c.evaluate(&Value::Int(100)), ComparisonResult::False);
        assert_eq!(c.evaluate(&Value::Null), ComparisonResult::Unknown);
    }

    #[test]
    fn test_insertion_order_is_stable() {
        let conds = Conditions::new()
            .with("b", 1)
            .with("a", 2)
            .with("b", 3);
        let names: Vec<_> = conds.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(conds.get("b"), Some(&Condition::from(3)));
        assert_eq!(conds.len(), 2);
    }

    #[test]
    fn test_from_iterator() {
        let conds: Conditions = vec![("value", Operator::gt(10))].into_iter().collect();
        assert!(matches!(conds.get("value"), Some(Condition::Operator(Operator::GreaterThan(_)))));
    }
}
