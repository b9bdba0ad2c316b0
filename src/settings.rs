//! Settings module: what the active query backend can do.
//!
//! Compilation always takes an explicit `Settings` value. A process-wide
//! default exists for the composition root: it is written once (normally by
//! [`crate::detect`]) and read as a copied snapshot, so a reader never sees
//! a half-updated set of flags.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

static CURRENT: RwLock<Settings> = RwLock::new(Settings::DEFAULT);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The backend's wildcard match respects case.
    pub sensitive_like: bool,
    /// The backend offers a dedicated case-insensitive wildcard match.
    pub insensitive_like: bool,
    /// The backend's equality respects case.
    pub sensitive_compare: bool,
    /// The backend evaluates regular expressions natively.
    pub use_regex: bool,
    /// Express case-insensitive equality as a wildcard match instead of
    /// `LOWER(column) = value`.
    pub use_like_for_compare: bool,
}

impl Settings {
    pub const DEFAULT: Settings = Settings {
        sensitive_like: true,
        insensitive_like: true,
        sensitive_compare: true,
        use_regex: true,
        use_like_for_compare: false,
    };

    /// Snapshot of the process-wide settings.
    pub fn current() -> Settings {
        *CURRENT.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the process-wide settings. All five flags change in one write.
    pub fn install(settings: Settings) {
        *CURRENT.write().unwrap_or_else(PoisonError::into_inner) = settings;
    }

    pub fn with_sensitive_like(mut self, value: bool) -> Self {
        self.sensitive_like = value;
        self
    }

    pub fn with_insensitive_like(mut self, value: bool) -> Self {
        self.insensitive_like = value;
        self
    }

    pub fn with_sensitive_compare(mut self, value: bool) -> Self {
        self.sensitive_compare = value;
        self
    }

    pub fn with_use_regex(mut self, value: bool) -> Self {
        self.use_regex = value;
        self
    }

    pub fn with_use_like_for_compare(mut self, value: bool) -> Self {
        self.use_like_for_compare = value;
        self
    }

    /// Flags by name, for diagnostics output.
    pub fn snapshot(&self) -> BTreeMap<&'static str, bool> {
        BTreeMap::from([
            ("sensitive_like", self.sensitive_like),
            ("insensitive_like", self.insensitive_like),
            ("sensitive_compare", self.sensitive_compare),
            ("use_regex", self.use_regex),
            ("use_like_for_compare", self.use_like_for_compare),
        ])
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert!(s.sensitive_like);
        assert!(s.insensitive_like);
        assert!(s.sensitive_compare);
        assert!(s.use_regex);
        assert!(!s.use_like_for_compare);
    }

    #[test]
    fn test_builder_overrides() {
        let s = Settings::default()
            .with_sensitive_like(false)
            .with_use_like_for_compare(true)
            .with_use_regex(false);
        assert!(!s.sensitive_like);
        assert!(s.use_like_for_compare);
        assert!(!s.use_regex);
        assert!(s.sensitive_compare);
    }

    #[test]
    fn test_snapshot_names_every_flag() {
        let snap = Settings::default().with_use_regex(false).snapshot();
        assert_eq!(snap.len(), 5);
        assert_eq!(snap["use_regex"], false);
        assert_eq!(snap["sensitive_like"], true);
    }

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let s: Settings = serde_json::from_str(r#"{"use_regex": false}"#).unwrap();
        assert_eq!(s, Settings::default().with_use_regex(false));
    }

    #[test]
    fn test_serialization_deserialization() {
        let s = Settings::default().with_sensitive_compare(false);
        let json = serde_json::to_string(&s).unwrap();
        let deser: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(s, deser);
    }
}
