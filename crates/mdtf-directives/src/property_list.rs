//! Delimited `key=value` / `key:value` list parsing.
//!
//! Operators write attribute and abbreviation lists as free-form text:
//!
//! ```text
//! MSFT=Microsoft
//! HP: Hewlett Packard
//! SKU = Stock Keeping Unit
//! ```
//!
//! Each entry is split at the first `=` or `:` it contains, whichever comes
//! first. Everything after that position belongs to the value, so
//! `href=https://example.com` keeps its colon.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Characters accepted between a key and its value.
const KEY_VALUE_SEPARATORS: [char; 2] = ['=', ':'];

/// Entry that contains neither `=` nor `:`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("malformed property entry {entry:?}: expected `key=value` or `key:value`")]
pub struct MalformedEntry {
    /// The offending entry, trimmed.
    pub entry: String,
}

/// Ordered mapping of attribute names to values.
///
/// Insertion order is preserved. Re-inserting an existing key replaces its
/// value in place, so the key keeps its first-seen position.
///
/// # Example
///
/// ```
/// use mdtf_directives::PropertyList;
///
/// let mut list = PropertyList::new();
/// list.insert("class", "hero");
/// list.insert("alt", "Banner");
/// list.insert("class", "wide");
///
/// assert_eq!(list.get("class"), Some("wide"));
/// assert_eq!(list.keys().collect::<Vec<_>>(), vec!["class", "alt"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropertyList {
    entries: Vec<(String, String)>,
}

impl PropertyList {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the previous value for `key` if there was one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        if let Some((_, existing)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(existing, value));
        }
        self.entries.push((key, value));
        None
    }

    /// Look up a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PropertyList {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut list = Self::new();
        for (key, value) in iter {
            list.insert(key, value);
        }
        list
    }
}

impl Serialize for PropertyList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Parse a delimited property list.
///
/// `input` is split on `separator`; entries that are blank after trimming are
/// skipped. Each remaining entry is split once at its first `=` or `:`, and
/// both halves are trimmed. Duplicate keys keep the last value.
///
/// # Errors
///
/// Returns [`MalformedEntry`] for the first entry containing neither `=` nor
/// `:`. No partial list is returned.
///
/// # Example
///
/// ```
/// use mdtf_directives::parse_property_list;
///
/// let list = parse_property_list("target=_blank, rel: nofollow", ",").unwrap();
/// assert_eq!(list.get("target"), Some("_blank"));
/// assert_eq!(list.get("rel"), Some("nofollow"));
///
/// assert!(parse_property_list("target=_blank,bogus", ",").is_err());
/// ```
pub fn parse_property_list(input: &str, separator: &str) -> Result<PropertyList, MalformedEntry> {
    let mut list = PropertyList::new();

    let entries: Box<dyn Iterator<Item = &str>> = if separator.is_empty() {
        Box::new(std::iter::once(input))
    } else {
        Box::new(input.split(separator))
    };

    for entry in entries {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }

        let Some(pos) = entry.find(KEY_VALUE_SEPARATORS) else {
            return Err(MalformedEntry {
                entry: entry.to_owned(),
            });
        };

        // Both separators are ASCII, so `pos + 1` is a char boundary.
        let key = entry[..pos].trim();
        let value = entry[pos + 1..].trim();
        list.insert(key, value);
    }

    Ok(list)
}
