//! Detect module: learn backend capabilities by running four scalar probes.
//!
//! Run once, after a connection is available and before any filtering.

use crate::settings::Settings;
use crate::types::Value;
use crate::{Error, Result};

/// A single scalar probe statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Probe {
    /// `'a' LIKE 'A'`, asking for a case-sensitive match.
    SensitiveLike,
    /// `'a' LIKE 'A'`, asking for a case-insensitive match.
    InsensitiveLike,
    /// `'a' = 'A'`
    Equality,
    /// `'a' ~ 'a'`
    Regex,
}

impl Probe {
    pub const ALL: [Probe; 4] = [
        Probe::SensitiveLike,
        Probe::InsensitiveLike,
        Probe::Equality,
        Probe::Regex,
    ];

    /// Left and right operands of the probe.
    pub fn operands(self) -> (&'static str, &'static str) {
        match self {
            Probe::SensitiveLike | Probe::InsensitiveLike | Probe::Equality => ("a", "A"),
            Probe::Regex => ("a", "a"),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Probe::SensitiveLike => "sensitive_like",
            Probe::InsensitiveLike => "insensitive_like",
            Probe::Equality => "equality",
            Probe::Regex => "regex",
        }
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ProbeError {
    /// The backend cannot express the probe at all.
    #[error("probe not supported by backend")]
    NotSupported,

    #[error("probe failed: {0}")]
    Failed(String),
}

/// Runs probe statements against the backend.
pub trait ProbeExecutor {
    /// Execute `probe` and return its single scalar result. `collation`, when
    /// given, is applied verbatim to the probe statement.
    fn select_value(&self, probe: Probe, collation: Option<&str>) -> std::result::Result<Value, ProbeError>;

    /// Collation of the connection, if it has one.
    fn collation(&self) -> Option<String> {
        None
    }
}

/// Probe the backend and return the settings it supports.
///
/// Only `mysql` backends get an explicit collation; elsewhere the default
/// collation gives the expected answers.
pub fn detect<E: ProbeExecutor + ?Sized>(executor: &E, backend: &str) -> Result<Settings> {
    let collation = if backend.contains("mysql") {
        executor.collation()
    } else {
        None
    };
    let run = |probe| probe_boolean(executor, probe, collation.as_deref());

    let sensitive_like = !run(Probe::SensitiveLike)?;
    let insensitive_like = run(Probe::InsensitiveLike)?;
    let sensitive_compare = !run(Probe::Equality)?;
    let use_regex = run(Probe::Regex)?;
    let settings = Settings {
        sensitive_like,
        insensitive_like,
        sensitive_compare,
        use_regex,
        use_like_for_compare: !sensitive_like,
    };
    tracing::info!(backend, ?settings, "detected backend settings");
    Ok(settings)
}

/// Probe the backend and install the result as the process-wide settings.
pub fn detect_and_install<E: ProbeExecutor + ?Sized>(executor: &E, backend: &str) -> Result<Settings> {
    let settings = detect(executor, backend)?;
    Settings::install(settings);
    Ok(settings)
}

fn probe_boolean<E: ProbeExecutor + ?Sized>(executor: &E, probe: Probe, collation: Option<&str>) -> Result<bool> {
    match executor.select_value(probe, collation) {
        Ok(value) => {
            let result = matches!(value, Value::Bool(true) | Value::Int(1));
            tracing::debug!(probe = probe.name(), result, "capability probe");
            Ok(result)
        }
        Err(ProbeError::NotSupported) => {
            tracing::warn!(probe = probe.name(), "capability probe not supported, assuming false");
            Ok(false)
        }
        Err(ProbeError::Failed(reason)) => Err(Error::Probe(reason)),
    }
}
