//! Key-value pairs stored in the skip list.

use std::fmt;

/// A key and its value.
///
/// The key never changes once the entry is in the list. The value can be
/// replaced in place by `set` on the same key.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Entry {
    pub(crate) key: String,
    pub(crate) value: Vec<u8>,
}

impl Entry {
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Entry {
        Entry {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Byte footprint counted towards the list's `size`: key length plus
    /// value length. Node and link overhead is not included.
    pub fn footprint(&self) -> u64 {
        (self.key.len() + self.value.len()) as u64
    }

    pub fn into_parts(self) -> (String, Vec<u8>) {
        (self.key, self.value)
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.value) {
            Ok(text) => write!(f, "({:?}, {:?})", self.key, text),
            Err(_) => write!(f, "({:?}, {:?})", self.key, self.value),
        }
    }
}

impl<K: Into<String>, V: Into<Vec<u8>>> From<(K, V)> for Entry {
    fn from((key, value): (K, V)) -> Entry {
        Entry::new(key, value)
    }
}
