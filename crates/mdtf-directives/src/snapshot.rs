//! Configuration values as read from the host's configuration store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single configuration value.
///
/// `Null` means "let the engine use its own default", which is distinct from
/// an empty string.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Text(String),
    Null,
}

impl ConfigValue {
    /// Short name of the value's shape, used in error messages.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Text(_) => "string",
            Self::Null => "null",
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<ConfigValue>> From<Option<T>> for ConfigValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Read-only snapshot of named configuration values.
///
/// Keys use the configuration field names (`linkAttributes`,
/// `html5ElementSuffix`, ...). A missing key is equivalent to the field's
/// default.
///
/// # Example
///
/// ```
/// use mdtf_directives::{ConfigSnapshot, ConfigValue};
///
/// let config = ConfigSnapshot::new()
///     .with("html5ElementSuffix", true)
///     .with("tableClass", None::<String>);
///
/// assert_eq!(config.get("html5ElementSuffix"), Some(&ConfigValue::Bool(true)));
/// assert_eq!(config.get("tableClass"), Some(&ConfigValue::Null));
/// assert_eq!(config.get("codeClass"), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ConfigSnapshot {
    values: BTreeMap<String, ConfigValue>,
}

impl ConfigSnapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a value, replacing any previous one.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ConfigValue>) {
        self.values.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ConfigValue> {
        self.values.get(name)
    }

    /// Remove a value so the field falls back to its default.
    pub fn remove(&mut self, name: &str) -> Option<ConfigValue> {
        self.values.remove(name)
    }

    /// Merge `other` into `self`; values in `other` win.
    pub fn merge(&mut self, other: Self) {
        self.values.extend(other.values);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<ConfigValue>> FromIterator<(K, V)> for ConfigSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for (name, value) in iter {
            snapshot.set(name, value);
        }
        snapshot
    }
}
