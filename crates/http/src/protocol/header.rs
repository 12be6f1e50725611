//! Header storage shared by requests, responses and trailers.
//!
//! Names are compared ASCII case-insensitively, so a map never holds two
//! entries that differ only in case. Names that come off the wire are stored
//! lower-cased by the decoder; names inserted by handler code keep the
//! spelling they were given, which is the spelling written back out.

use std::fmt;

/// An insertion-ordered header map with fold-on-repeat semantics.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<(String, String)>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: Vec::with_capacity(capacity) }
    }

    /// Headers for a plain-text response of `content_length` bytes on a
    /// connection that closes after the response.
    pub fn default_response(content_length: usize) -> Self {
        let mut headers = Self::with_capacity(3);
        headers.insert("Content-Length", content_length.to_string());
        headers.insert("Connection", "close");
        headers.insert("Content-Type", "text/plain");
        headers
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|index| self.entries[index].1.as_str())
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Adds a value, folding it into an existing entry as `"old, new"` when
    /// the name is already present.
    pub fn append(&mut self, name: impl Into<String>, value: impl AsRef<str>) {
        let name = name.into();
        let value = value.as_ref();
        match self.position(&name) {
            Some(index) => {
                let existing = &mut self.entries[index].1;
                existing.reserve(value.len() + 2);
                existing.push_str(", ");
                existing.push_str(value);
            }
            None => self.entries.push((name, value.to_owned())),
        }
    }

    /// Sets a value, replacing both spelling and value of any existing entry.
    /// Returns the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(index) => {
                let (_, old) = std::mem::replace(&mut self.entries[index], (name, value));
                Some(old)
            }
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.position(name).map(|index| self.entries.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(key, _)| key.eq_ignore_ascii_case(name))
    }
}

impl fmt::Debug for HeaderMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> FromIterator<(K, V)> for HeaderMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = HeaderMap::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

/// Characters allowed in a header field name, after lower-casing.
pub(crate) fn is_token_byte(b: u8) -> bool {
    matches!(b,
        b'a'..=b'z' | b'0'..=b'9'
        | b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*'
        | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~')
}
