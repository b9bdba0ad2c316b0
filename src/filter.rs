//! Filter module: apply a condition set to a collection, in memory or by
//! handing compiled fragments to a query scope.
//!
//! Per record, each condition yields a [`ComparisonResult`] and
//! [`ComparisonResult::satisfied`] decides whether it counts. A plain filter
//! keeps records that satisfy **all** conditions. A negated filter keeps
//! records that satisfy **any** negated condition, i.e. `NOT (A AND B)` is
//! `(NOT A) OR (NOT B)` condition by condition, and an `Unknown` comparison
//! never counts either way.

use crate::compiler::FragmentCompiler;
use crate::condition::Conditions;
use crate::fragment::Fragment;
use crate::record::Record;
use crate::settings::Settings;
use crate::types::{ComparisonResult, Value};
use crate::Result;

/// A query collection the fragments are handed to, e.g. a relation builder
/// of an external query engine.
pub trait Scope: Sized {
    /// Restrict to rows matching every fragment.
    fn filter_by(self, fragments: Vec<Fragment>) -> Self;
    /// Restrict to rows not matching the conjunction of the fragments.
    fn exclude(self, fragments: Vec<Fragment>) -> Self;
}

/// Per-condition results for one record, in condition order.
pub fn evaluate<R: Record + ?Sized>(record: &R, conditions: &Conditions) -> Vec<ComparisonResult> {
    results(record, conditions).collect()
}

/// Whether `record` is kept by the (optionally negated) condition set.
pub fn matches<R: Record + ?Sized>(record: &R, conditions: &Conditions, negate: bool) -> bool {
    let mut outcomes = results(record, conditions);
    if negate {
        outcomes.any(|r| r.satisfied(true))
    } else {
        outcomes.all(|r| r.satisfied(false))
    }
}

fn results<'a, R: Record + ?Sized>(
    record: &'a R,
    conditions: &'a Conditions,
) -> impl Iterator<Item = ComparisonResult> + 'a {
    conditions
        .iter()
        .map(move |(field, condition)| condition.evaluate(record.field(field).unwrap_or(&Value::Null)))
}

/// Filter records in memory.
pub fn filter_records<'a, R: Record>(records: &'a [R], conditions: &Conditions, negate: bool) -> Vec<&'a R> {
    let kept: Vec<&R> = records
        .iter()
        .filter(|record| matches(*record, conditions, negate))
        .collect();
    tracing::trace!(
        records = records.len(),
        conditions = conditions.len(),
        negate,
        kept = kept.len(),
        "filtered records"
    );
    kept
}

/// Filter a query scope by compiling every condition against `settings`.
pub fn filter_scope<S: Scope>(scope: S, conditions: &Conditions, negate: bool, settings: &Settings) -> Result<S> {
    let fragments = FragmentCompiler::new(*settings).compile_all(conditions)?;
    Ok(if negate {
        scope.exclude(fragments)
    } else {
        scope.filter_by(fragments)
    })
}

/// `where` / `where not` on in-memory collections.
pub trait FilterExt<R> {
    fn matching(&self, conditions: &Conditions) -> Vec<&R>;
    fn not_matching(&self, conditions: &Conditions) -> Vec<&R>;
}

impl<R: Record> FilterExt<R> for [R] {
    fn matching(&self, conditions: &Conditions) -> Vec<&R> {
        filter_records(self, conditions, false)
    }

    fn not_matching(&self, conditions: &Conditions) -> Vec<&R> {
        filter_records(self, conditions, true)
    }
}
