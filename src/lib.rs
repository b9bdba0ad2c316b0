//! Whereclause: null-aware predicate operators for filtering records.
//!
//! The same condition set can run two ways and must agree on every record:
//! evaluated directly against in-memory records, or compiled into query
//! fragments for an external query engine. The crate settles the cases
//! where backends disagree: three-valued null logic, case sensitivity, and
//! when a regular expression can become a plain equality or wildcard match.
//!
//! # Architecture
//! - Capability settings (what the backend supports)
//! - Operators with tri-valued in-memory evaluation
//! - Regex to wildcard-pattern downgrade
//! - Capability-aware fragment compilation
//! - Collection filtering with negation semantics
//! - One-time capability detection

mod types;
mod settings;
mod operator;
mod condition;
mod record;
mod downgrade;
mod fragment;
mod compiler;
mod filter;
mod detect;

pub use types::*;
pub use settings::*;
pub use operator::*;
pub use condition::*;
pub use record::*;
pub use downgrade::*;
pub use fragment::*;
pub use compiler::*;
pub use filter::*;
pub use detect::*;

use thiserror::Error;

/// Unified error type for Whereclause operations
#[derive(Debug, Error)]
pub enum Error {
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Unsupported: column {column} needs regex /{pattern}/ but the backend has no regex support")]
    Unsupported { column: String, pattern: String },

    #[error("Probe error: {0}")]
    Probe(String),
}

pub type Result<T> = std::result::Result<T, Error>;
