//! Required settings for the RAG service under test.
//!
//! The four values are captured once from the process environment into an
//! [`EnvSnapshot`]. The environment check turns a complete snapshot into
//! [`Settings`], which every later stage receives by reference.

use std::collections::BTreeMap;
use std::fmt;

pub const COHERE_API_KEY: &str = "COHERE_API_KEY";
pub const QDRANT_URL: &str = "QDRANT_URL";
pub const QDRANT_API_KEY: &str = "QDRANT_API_KEY";
pub const TARGET_URL: &str = "TARGET_URL";

/// Settings that must be present before any network check runs, in report order.
pub const REQUIRED_SETTINGS: [&str; 4] = [COHERE_API_KEY, QDRANT_URL, QDRANT_API_KEY, TARGET_URL];

/// Immutable copy of the required settings, taken at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    values: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Capture the required settings from the process environment.
    pub fn capture() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Capture the required settings through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let values = REQUIRED_SETTINGS
            .iter()
            .filter_map(|name| lookup(name).map(|v| (name.to_string(), v)))
            .collect();
        Self { values }
    }

    /// Build a snapshot from explicit name/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { values }
    }

    /// The value for `name`, if set to something non-empty.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Required names that are unset or empty, in declared order.
    pub fn missing(&self) -> Vec<String> {
        REQUIRED_SETTINGS
            .iter()
            .filter(|name| self.get(name).is_none())
            .map(|name| name.to_string())
            .collect()
    }
}

/// Validated settings. Only constructed when every required value is present.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub cohere_api_key: String,
    pub qdrant_url: String,
    pub qdrant_api_key: String,
    pub target_url: String,
}

impl Settings {
    /// Build settings from a snapshot, or return the missing names.
    pub fn from_snapshot(snapshot: &EnvSnapshot) -> Result<Self, Vec<String>> {
        let missing = snapshot.missing();
        if !missing.is_empty() {
            return Err(missing);
        }
        let value = |name: &str| snapshot.get(name).unwrap_or_default().to_string();
        Ok(Self {
            cohere_api_key: value(COHERE_API_KEY),
            qdrant_url: value(QDRANT_URL),
            qdrant_api_key: value(QDRANT_API_KEY),
            target_url: value(TARGET_URL),
        })
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("cohere_api_key", &"[REDACTED]")
            .field("qdrant_url", &self.qdrant_url)
            .field("qdrant_api_key", &"[REDACTED]")
            .field("target_url", &self.target_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_snapshot() -> EnvSnapshot {
        EnvSnapshot::from_pairs([
            (COHERE_API_KEY, "co-key"),
            (QDRANT_URL, "https://qdrant.example"),
            (QDRANT_API_KEY, "qd-key"),
            (TARGET_URL, "https://book.example"),
        ])
    }

    #[test]
    fn test_from_lookup_only_keeps_required_names() {
        let snapshot = EnvSnapshot::from_lookup(|name| match name {
            TARGET_URL => Some("https://book.example".to_string()),
            _ => None,
        });
        assert_eq!(snapshot.get(TARGET_URL), Some("https://book.example"));
        assert_eq!(snapshot.missing().len(), 3);
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let snapshot = EnvSnapshot::from_pairs([
            (COHERE_API_KEY, ""),
            (QDRANT_URL, "u"),
            (QDRANT_API_KEY, "k"),
            (TARGET_URL, "t"),
        ]);
        assert_eq!(snapshot.missing(), vec![COHERE_API_KEY.to_string()]);
    }

    #[test]
    fn test_settings_from_full_snapshot() {
        let settings = Settings::from_snapshot(&full_snapshot()).unwrap();
        assert_eq!(settings.target_url, "https://book.example");
        assert_eq!(settings.qdrant_url, "https://qdrant.example");
    }

    #[test]
    fn test_settings_debug_redacts_keys() {
        let settings = Settings::from_snapshot(&full_snapshot()).unwrap();
        let debug = format!("{:?}", settings);
        assert!(!debug.contains("co-key"));
        assert!(!debug.contains("qd-key"));
        assert!(debug.contains("https://book.example"));
    }
}
