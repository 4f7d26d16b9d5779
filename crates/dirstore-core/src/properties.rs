//! Connection properties with group-scoped overrides
//!
//! Properties arrive as an ordered `key=value` map read from a `.properties`
//! file. A logical group (e.g. `metric`) can override individual keys by
//! prefixing them: `metric.maxConnections=4` overrides `maxConnections` when
//! the properties are scoped to the `metric` group.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{DirstoreError, Result};

/// Key suffix marking a property value as an encrypted secret
const SECRET_KEY_SUFFIX: &str = "bindPassword";

/// Whether a property key holds an encrypted secret that must be decrypted
/// before the value is handed to a backend factory.
pub fn is_secret_key(key: &str) -> bool {
    key == SECRET_KEY_SUFFIX || key.ends_with(&format!(".{SECRET_KEY_SUFFIX}"))
}

/// Ordered connection properties for one backend store
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionProperties {
    entries: IndexMap<String, String>,
}

impl ConnectionProperties {
    /// Create an empty property set
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Parse properties from `.properties` text: one `key=value` per line,
    /// blank lines and `#`/`!` comment lines ignored, values may contain `=`.
    pub fn parse(text: &str) -> Result<Self> {
        let mut entries = IndexMap::new();
        for (lineno, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(DirstoreError::InvalidConfiguration(format!(
                    "line {}: expected key=value, got {:?}",
                    lineno + 1,
                    raw
                )));
            };
            entries.insert(key.trim().to_string(), value.trim().to_string());
        }
        Ok(Self { entries })
    }

    /// Set a property, replacing any previous value for the key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Builder-style `insert`
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get a property value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Get a required property, failing with `InvalidConfiguration` when absent
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key).ok_or_else(|| {
            DirstoreError::InvalidConfiguration(format!("missing required property {key:?}"))
        })
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate properties in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Keys of properties holding encrypted secrets
    pub fn secret_keys(&self) -> Vec<&str> {
        self.entries
            .keys()
            .map(String::as_str)
            .filter(|k| is_secret_key(k))
            .collect()
    }

    /// Apply group-specific overrides for `group`.
    ///
    /// Returns a copy in which, for every key of the form `"<group>.<key>"`,
    /// a plain `<key>` entry is inserted with that value, overwriting any
    /// same-named global key. The prefixed keys themselves remain present
    /// (they are advisory; factories consume the plain keys). An empty or
    /// absent group returns the properties unchanged.
    pub fn scoped_to_group(&self, group: Option<&str>) -> Self {
        let mut scoped = self.clone();
        let Some(group) = group.filter(|g| !g.is_empty()) else {
            return scoped;
        };
        let prefix = format!("{group}.");
        let overrides: Vec<(String, String)> = self
            .entries
            .iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(&prefix)
                    .map(|plain| (plain.to_string(), value.clone()))
            })
            .collect();
        for (key, value) in overrides {
            scoped.entries.insert(key, value);
        }
        scoped
    }
}

impl FromIterator<(String, String)> for ConnectionProperties {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

// Secret values must never end up in logs, so Debug redacts them.
impl fmt::Debug for ConnectionProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in &self.entries {
            if is_secret_key(key) {
                map.entry(key, &"<redacted>");
            } else {
                map.entry(key, value);
            }
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_override_wins() {
        let props = ConnectionProperties::new()
            .with("maxConnections", "10")
            .with("metric.maxConnections", "4")
            .with("servers", "localhost:1636");

        let scoped = props.scoped_to_group(Some("metric"));
        assert_eq!(scoped.get("maxConnections"), Some("4"));
        // Non-conflicting globals pass through unchanged
        assert_eq!(scoped.get("servers"), Some("localhost:1636"));
        // Prefixed key stays present, advisory only
        assert_eq!(scoped.get("metric.maxConnections"), Some("4"));
    }

    #[test]
    fn test_group_override_inserts_new_plain_key() {
        let props = ConnectionProperties::new().with("metric.baseDn", "o=metric");
        let scoped = props.scoped_to_group(Some("metric"));
        assert_eq!(scoped.get("baseDn"), Some("o=metric"));
    }

    #[test]
    fn test_empty_group_is_passthrough() {
        let props = ConnectionProperties::new()
            .with("maxConnections", "10")
            .with("metric.maxConnections", "4");

        let scoped = props.scoped_to_group(Some(""));
        assert_eq!(scoped.get("maxConnections"), Some("10"));
        let scoped = props.scoped_to_group(None);
        assert_eq!(scoped.get("maxConnections"), Some("10"));
    }

    #[test]
    fn test_unrelated_group_prefix_untouched() {
        let props = ConnectionProperties::new().with("central.servers", "central:1636");
        let scoped = props.scoped_to_group(Some("metric"));
        assert_eq!(scoped.get("servers"), None);
        assert_eq!(scoped.get("central.servers"), Some("central:1636"));
    }

    #[test]
    fn test_parse_properties_text() {
        let text = "\
# primary store
servers=localhost:1636
bindDn=cn=Directory Manager

! legacy comment marker
bindPassword=enc:c2VjcmV0
useSSL = true
filter=(&(objectClass=top)(uid=admin))
";
        let props = ConnectionProperties::parse(text).unwrap();
        assert_eq!(props.len(), 5);
        assert_eq!(props.get("servers"), Some("localhost:1636"));
        assert_eq!(props.get("bindDn"), Some("cn=Directory Manager"));
        assert_eq!(props.get("useSSL"), Some("true"));
        // Values keep everything after the first '='
        assert_eq!(props.get("filter"), Some("(&(objectClass=top)(uid=admin))"));
    }

    #[test]
    fn test_parse_rejects_line_without_separator() {
        let err = ConnectionProperties::parse("servers localhost").unwrap_err();
        assert!(matches!(
            err,
            crate::DirstoreError::InvalidConfiguration(msg) if msg.contains("line 1")
        ));
    }

    #[test]
    fn test_secret_key_detection() {
        assert!(is_secret_key("bindPassword"));
        assert!(is_secret_key("auth.ldap.bindPassword"));
        assert!(!is_secret_key("bindDn"));
        assert!(!is_secret_key("bindPasswordFile"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let props = ConnectionProperties::new()
            .with("bindDn", "cn=admin")
            .with("bindPassword", "hunter2");
        let rendered = format!("{props:?}");
        assert!(rendered.contains("cn=admin"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_require_missing_key() {
        let props = ConnectionProperties::new();
        assert!(matches!(
            props.require("servers"),
            Err(crate::DirstoreError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let props = ConnectionProperties::new()
            .with("b", "2")
            .with("a", "1")
            .with("c", "3");
        let keys: Vec<&str> = props.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }
}
