//! Thread-safe skip list behind a single lock.
//!
//! Every operation, reads included, takes the same exclusive lock for its
//! whole search-then-splice sequence. No caller can see a half-linked node.
//! Reads do not run in parallel with each other; a reader-biased lock would
//! allow that and is the obvious next step if reads dominate.

use parking_lot::{Mutex, MutexGuard};

use crate::config::{ConfigError, Options};
use crate::entry::Entry;
use crate::iter::Cursor;
use crate::map::SkipMap;
use crate::node::Handle;

/// A [`SkipMap`] that can be shared between threads.
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
///
/// use skipkv::SkipList;
///
/// let list = Arc::new(SkipList::new(10));
/// let writer = {
///     let list = Arc::clone(&list);
///     thread::spawn(move || {
///         for i in 0..100 {
///             list.set(i.to_string(), i.to_string());
///         }
///     })
/// };
/// writer.join().unwrap();
/// assert_eq!(list.len(), 100);
/// ```
#[derive(Debug)]
pub struct SkipList {
    /// Copied out of the map so reading it needs no lock.
    max_level: usize,
    inner: Mutex<SkipMap>,
}

/// An owned snapshot of one entry plus enough to step from it later.
///
/// Unlike [`Cursor`], a position does not hold the lock. If its entry is
/// removed before the next step, `next`/`prev` continue from where the key
/// would sort instead of following a dead node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    handle: Handle,
    entry: Entry,
}

impl Position {
    fn from_cursor(cursor: Cursor<'_>) -> Position {
        Position {
            handle: cursor.handle(),
            entry: cursor.entry().clone(),
        }
    }

    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    pub fn key(&self) -> &str {
        self.entry.key()
    }

    pub fn value(&self) -> &[u8] {
        self.entry.value()
    }

    pub fn into_entry(self) -> Entry {
        self.entry
    }
}

impl SkipList {
    /// Panics if `max_level` is out of range, like [`SkipMap::new`].
    pub fn new(max_level: usize) -> SkipList {
        SkipList::from(SkipMap::new(max_level))
    }

    pub fn with_options(options: Options) -> Result<SkipList, ConfigError> {
        SkipMap::with_options(options).map(SkipList::from)
    }

    pub fn max_level(&self) -> usize {
        self.max_level
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn size(&self) -> u64 {
        self.inner.lock().size()
    }

    /// Insert or update. Returns the replaced value, if any.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Option<Vec<u8>> {
        self.inner.lock().set(key, value)
    }

    /// Copy of the entry for `key`.
    pub fn get(&self, key: &str) -> Option<Entry> {
        self.inner.lock().get(key).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.lock().contains_key(key)
    }

    pub fn remove(&self, key: &str) -> Option<Entry> {
        self.inner.lock().remove(key)
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn front(&self) -> Option<Position> {
        self.inner.lock().front().map(Position::from_cursor)
    }

    pub fn back(&self) -> Option<Position> {
        self.inner.lock().back().map(Position::from_cursor)
    }

    pub fn next(&self, position: &Position) -> Option<Position> {
        self.inner
            .lock()
            .next_after(position.handle, position.key())
            .map(Position::from_cursor)
    }

    pub fn prev(&self, position: &Position) -> Option<Position> {
        self.inner
            .lock()
            .prev_before(position.handle, position.key())
            .map(Position::from_cursor)
    }

    /// Copy every entry out in key order, under one lock acquisition.
    pub fn snapshot(&self) -> Vec<Entry> {
        self.inner.lock().iter().cloned().collect()
    }

    /// Hold the lock and work on the map directly, e.g. to iterate without
    /// copying. Every other caller blocks until the guard is dropped.
    pub fn lock(&self) -> MutexGuard<'_, SkipMap> {
        self.inner.lock()
    }

    pub fn into_inner(self) -> SkipMap {
        self.inner.into_inner()
    }
}

impl From<SkipMap> for SkipList {
    fn from(map: SkipMap) -> SkipList {
        SkipList {
            max_level: map.max_level(),
            inner: Mutex::new(map),
        }
    }
}

impl Default for SkipList {
    fn default() -> Self {
        SkipList::from(SkipMap::default())
    }
}
