use crate::core::normalize::{CaseFold, Identity, KeyNormalizer};
use crate::domain::model::{Entry, State, ValueList};
use crate::domain::ports::StateObject;
use crate::utils::error::{OdictError, Result};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

/// An ordered list of `(key, value)` entries with multimap lookups.
///
/// Keys may repeat and entry order is significant, which is what header
/// blocks need. All key lookups go through the normalizer `N`; the stored
/// key text is never rewritten by a lookup.
#[derive(Clone, Default)]
pub struct OrderedMultiMap<N: KeyNormalizer = Identity> {
    entries: Vec<Entry>,
    norm: N,
}

/// Variant whose lookups ignore key case. Stored key case is preserved.
pub type CaselessOrderedMultiMap = OrderedMultiMap<CaseFold>;

impl<N: KeyNormalizer> OrderedMultiMap<N> {
    pub fn new() -> Self {
        Self::with_normalizer(N::default())
    }

    pub fn with_normalizer(norm: N) -> Self {
        Self {
            entries: Vec::new(),
            norm,
        }
    }

    pub fn from_entries<I, E>(entries: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Entry>,
    {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
            norm: N::default(),
        }
    }

    pub fn normalizer(&self) -> &N {
        &self.norm
    }

    fn key_matches(&self, stored: &str, wanted: &str) -> bool {
        self.norm.normalize(stored) == wanted
    }

    /// Values of every entry whose key matches, in entry order.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        let wanted = self.norm.normalize(key);
        self.entries
            .iter()
            .filter(|entry| self.key_matches(&entry.key, &wanted))
            .map(|entry| entry.value.as_str())
            .collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        let wanted = self.norm.normalize(key);
        self.entries
            .iter()
            .any(|entry| self.key_matches(&entry.key, &wanted))
    }

    /// Distinct normalized keys. Unordered.
    pub fn keys(&self) -> HashSet<String> {
        self.entries
            .iter()
            .map(|entry| self.norm.normalize(&entry.key).into_owned())
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<Vec<&str>> {
        let values = self.get_all(key);
        if values.is_empty() {
            None
        } else {
            Some(values)
        }
    }

    pub fn get_or<'a>(&'a self, key: &str, default: Vec<&'a str>) -> Vec<&'a str> {
        self.get(key).unwrap_or(default)
    }

    pub fn get_first(&self, key: &str) -> Option<&str> {
        let wanted = self.norm.normalize(key);
        self.entries
            .iter()
            .find(|entry| self.key_matches(&entry.key, &wanted))
            .map(|entry| entry.value.as_str())
    }

    pub fn get_first_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get_first(key).unwrap_or(default)
    }

    /// Total number of entries, duplicates included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn items(&self) -> Vec<(&str, &str)> {
        self.entries.iter().map(Entry::as_pair).collect()
    }

    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push(Entry::new(key, value));
    }

    /// Removes every entry whose key matches.
    pub fn delete(&mut self, key: &str) {
        let wanted = self.norm.normalize(key).into_owned();
        let norm = &self.norm;
        self.entries
            .retain(|entry| norm.normalize(&entry.key) != wanted.as_str());
    }

    /// Appends clones of all entries of `other`, duplicates included.
    pub fn extend_from<M: KeyNormalizer>(&mut self, other: &OrderedMultiMap<M>) {
        self.entries.extend(other.entries.iter().cloned());
    }

    /// Replaces the values stored under `key`.
    ///
    /// Matching entries are overwritten in place, in order, one per supplied
    /// value, and take the caller's spelling of `key`. Matches beyond the
    /// supplied values are removed; values beyond the existing matches are
    /// appended at the end.
    ///
    /// Passing a single string is rejected with `InvalidArgument`.
    pub fn set_values(&mut self, key: &str, values: impl Into<ValueList>) -> Result<()> {
        let values = match values.into() {
            ValueList::Many(values) => values,
            ValueList::Scalar(value) => {
                return Err(OdictError::invalid_argument(format!(
                    "expected a list of values for '{}' instead of the string '{}'. \
                     Example: set_values(\"Host\", [\"www.example.com\"])",
                    key, value
                )))
            }
        };

        let wanted = self.norm.normalize(key).into_owned();
        let mut pending = values.into_iter();
        let mut overwritten = 0usize;
        let mut dropped = 0usize;
        let mut rebuilt = Vec::with_capacity(self.entries.len() + pending.len());

        for entry in std::mem::take(&mut self.entries) {
            if self.norm.normalize(&entry.key) != wanted.as_str() {
                rebuilt.push(entry);
                continue;
            }
            match pending.next() {
                Some(value) => {
                    rebuilt.push(Entry::new(key, value));
                    overwritten += 1;
                }
                None => dropped += 1,
            }
        }

        let appended = pending.len();
        rebuilt.extend(pending.map(|value| Entry::new(key, value)));
        self.entries = rebuilt;

        tracing::debug!(key, overwritten, dropped, appended, "set_values");
        Ok(())
    }

    /// Whether any value stored under `key` contains `substring`.
    ///
    /// With `caseless`, both sides are lower-cased first, whatever the map's
    /// own key normalizer.
    pub fn in_any(&self, key: &str, substring: &str, caseless: bool) -> bool {
        let values = self.get_all(key);
        if caseless {
            let needle = substring.to_lowercase();
            values
                .iter()
                .any(|value| value.to_lowercase().contains(&needle))
        } else {
            values.iter().any(|value| value.contains(substring))
        }
    }

    /// Searches `pattern` in each entry rendered as `"key: value"`.
    pub fn match_regex(&self, pattern: impl AsRef<str>) -> Result<bool> {
        let re = Regex::new(pattern.as_ref())?;
        Ok(self.match_with(&re))
    }

    pub fn match_with(&self, re: &Regex) -> bool {
        self.entries
            .iter()
            .any(|entry| re.is_match(&format!("{}: {}", entry.key, entry.value)))
    }

    /// Substitutes every match of `pattern` in all keys and values.
    ///
    /// Returns the number of substitutions. `repl` uses the `regex` crate's
    /// replacement syntax: `$1` or `${name}` insert a group and `$$` is a
    /// literal `$`. A reference to a group the pattern does not define is
    /// rejected with `InvalidArgument` before anything is rewritten.
    ///
    /// An empty match directly after a non-empty one is skipped, so
    /// `x*` over `"abxd"` yields four substitutions, not five.
    pub fn replace(&mut self, pattern: impl AsRef<str>, repl: impl AsRef<str>) -> Result<usize> {
        let re = Regex::new(pattern.as_ref())?;
        self.replace_with(&re, repl.as_ref())
    }

    pub fn replace_with(&mut self, re: &Regex, repl: &str) -> Result<usize> {
        check_replacement(re, repl)?;
        let mut count = 0;
        for entry in &mut self.entries {
            count += substitute(re, &mut entry.key, repl);
            count += substitute(re, &mut entry.value, repl);
        }
        tracing::debug!(pattern = re.as_str(), count, "replace");
        Ok(count)
    }

    /// Wire rendering: `key: value` lines, each terminated by CRLF.
    pub fn format(&self) -> Vec<u8> {
        let size = self
            .entries
            .iter()
            .map(|entry| entry.key.len() + entry.value.len() + 4)
            .sum();
        let mut out = Vec::with_capacity(size);
        for entry in &self.entries {
            out.extend_from_slice(entry.key.as_bytes());
            out.extend_from_slice(b": ");
            out.extend_from_slice(entry.value.as_bytes());
            out.extend_from_slice(b"\r\n");
        }
        out
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Snapshot of all entries. `short` has no effect on this type.
    pub fn get_state(&self, _short: bool) -> State {
        self.entries.iter().cloned().map(Into::into).collect()
    }

    pub fn load_state(&mut self, state: State) {
        tracing::trace!(entries = state.len(), "load_state");
        self.entries = state.into_iter().map(Entry::from).collect();
    }

    pub fn from_state(state: State) -> Self {
        let mut map = Self::new();
        map.load_state(state);
        map
    }
}

/// Rejects `$group` references in `repl` that `re` does not define.
///
/// Mirrors how the `regex` crate reads a replacement: `$$` is an escaped `$`,
/// `${...}` names whatever sits before the closing brace, and a bare `$` takes
/// the longest run of `[_0-9a-zA-Z]`. Anything else after `$` is literal text.
pub fn check_replacement(re: &Regex, repl: &str) -> Result<()> {
    let is_name_char = |c: char| c == '_' || c.is_ascii_alphanumeric();
    let mut rest = repl;

    while let Some(at) = rest.find('$') {
        rest = &rest[at + 1..];
        if let Some(after) = rest.strip_prefix('$') {
            rest = after;
            continue;
        }

        let name = if let Some(braced) = rest.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => {
                    rest = &braced[end + 1..];
                    &braced[..end]
                }
                None => continue,
            }
        } else {
            let end = rest.find(|c: char| !is_name_char(c)).unwrap_or(rest.len());
            if end == 0 {
                continue;
            }
            let name = &rest[..end];
            rest = &rest[end..];
            name
        };

        let known = match name.parse::<usize>() {
            Ok(index) => index < re.captures_len(),
            Err(_) => re.capture_names().flatten().any(|group| group == name),
        };
        if !known {
            return Err(OdictError::invalid_argument(format!(
                "replacement '{}' references group '{}' which pattern '{}' does not define; \
                 write '$$' for a literal '$'",
                repl,
                name,
                re.as_str()
            )));
        }
    }

    Ok(())
}

fn substitute(re: &Regex, text: &mut String, repl: &str) -> usize {
    let hits = re.find_iter(text).count();
    if hits > 0 {
        let replaced = re.replace_all(text, repl).into_owned();
        *text = replaced;
    }
    hits
}

impl<N: KeyNormalizer> StateObject for OrderedMultiMap<N> {
    fn get_state(&self, short: bool) -> State {
        OrderedMultiMap::<N>::get_state(self, short)
    }

    fn load_state(&mut self, state: State) {
        OrderedMultiMap::<N>::load_state(self, state)
    }

    fn from_state(state: State) -> Self {
        OrderedMultiMap::<N>::from_state(state)
    }
}

impl<N: KeyNormalizer, M: KeyNormalizer> PartialEq<OrderedMultiMap<M>> for OrderedMultiMap<N> {
    fn eq(&self, other: &OrderedMultiMap<M>) -> bool {
        self.entries == other.entries
    }
}

impl<N: KeyNormalizer> Eq for OrderedMultiMap<N> {}

impl<N: KeyNormalizer> fmt::Debug for OrderedMultiMap<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(Entry::as_pair))
            .finish()
    }
}

impl<N: KeyNormalizer, K: Into<String>, V: Into<String>> From<Vec<(K, V)>> for OrderedMultiMap<N> {
    fn from(pairs: Vec<(K, V)>) -> Self {
        Self::from_entries(pairs)
    }
}

impl<N: KeyNormalizer, E: Into<Entry>> FromIterator<E> for OrderedMultiMap<N> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}

impl<N: KeyNormalizer, E: Into<Entry>> Extend<E> for OrderedMultiMap<N> {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        self.entries.extend(iter.into_iter().map(Into::into));
    }
}

impl<'a, N: KeyNormalizer> IntoIterator for &'a OrderedMultiMap<N> {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<N: KeyNormalizer> IntoIterator for OrderedMultiMap<N> {
    type Item = Entry;
    type IntoIter = std::vec::IntoIter<Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<N: KeyNormalizer> Serialize for OrderedMultiMap<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.iter().map(Entry::as_pair))
    }
}

impl<'de, N: KeyNormalizer> Deserialize<'de> for OrderedMultiMap<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        State::deserialize(deserializer).map(Self::from_state)
    }
}
