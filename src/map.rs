//! Single-threaded skip list.
//!
//! `SkipMap` owns the node arena and implements the algorithm: the shared
//! top-down search, insert-or-update, unlink-on-remove, and the level-0
//! traversal used by cursors and iterators. It takes `&mut self` for every
//! mutation; `SkipList` wraps it in a lock for shared use.
//!
//! # Search
//!
//! Every operation starts with the same descent. At each level, starting
//! from the top, move right while the next node's key is strictly less
//! than the target, then record where we stopped and drop a level:
//!
//! ```text
//! target = "d"
//!
//! Level 2: HEAD --------------> c* ----------------------> TAIL
//! Level 1: HEAD -----> b -----> c* ----------> f --------> TAIL
//! Level 0: HEAD -> a -> b -----> c* -> e -> f ----------> TAIL
//!                                 ^
//!                                 history = [c, c, c], candidate = e
//! ```
//!
//! The recorded nodes (the search history) are the predecessors a new node
//! is spliced after, one per level. The candidate is the level-0 successor
//! of the last recorded node; it is a match iff its key equals the target.

use std::fmt;

use smallvec::SmallVec;

use crate::config::{ConfigError, MAX_LEVEL_LIMIT, Options};
use crate::entry::Entry;
use crate::iter::{Cursor, Iter};
use crate::level::LevelGenerator;
use crate::node::{Arena, HEAD, Handle, Idx, NULL, TAIL};

/// Predecessor per level, indexed by level. Lives on the stack of the
/// operation that fills it.
type History = SmallVec<[Idx; MAX_LEVEL_LIMIT]>;

/// An ordered map from string keys to byte values.
///
/// ```
/// use skipkv::SkipMap;
///
/// let mut map = SkipMap::new(5);
/// map.set("b", "2");
/// map.set("a", "1");
/// map.set("c", "3");
///
/// let keys: Vec<&str> = map.iter().map(|entry| entry.key()).collect();
/// assert_eq!(keys, ["a", "b", "c"]);
/// assert_eq!(map.get("b").map(|entry| entry.value()), Some(&b"2"[..]));
/// ```
pub struct SkipMap {
    arena: Arena,
    levels: LevelGenerator,
    max_level: usize,
    /// Number of entries.
    len: usize,
    /// Sum of key and value byte lengths over all entries.
    size: u64,
}

impl SkipMap {
    /// Create an empty map whose nodes are at most `max_level` tall.
    ///
    /// Panics if `max_level` is zero or above [`MAX_LEVEL_LIMIT`]. Use
    /// [`SkipMap::with_options`] to get the error instead.
    pub fn new(max_level: usize) -> SkipMap {
        match SkipMap::with_options(Options::new(max_level)) {
            Ok(map) => map,
            Err(err) => panic!("invalid skip list options: {}", err),
        }
    }

    pub fn with_options(options: Options) -> Result<SkipMap, ConfigError> {
        options.validate()?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            max_level = options.max_level,
            probability = options.probability,
            seeded = options.seed.is_some(),
            "skip list created"
        );

        Ok(SkipMap {
            arena: Arena::new(options.max_level),
            levels: LevelGenerator::new(options.max_level, options.probability, options.seed),
            max_level: options.max_level,
            len: 0,
            size: 0,
        })
    }

    pub fn max_level(&self) -> usize {
        self.max_level
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total bytes of keys and values currently stored.
    pub fn size(&self) -> u64 {
        self.size
    }

    // --- Search ---

    /// Descend from the top level towards `key`, filling `history` with the
    /// last node before `key` at each level. Returns the level-0 candidate,
    /// which may be `TAIL`.
    fn search(&self, key: &str, history: &mut History) -> Idx {
        history.clear();
        history.resize(self.max_level, HEAD);

        let mut current = HEAD;
        for level in (0..self.max_level).rev() {
            loop {
                let next = self.arena.next(current, level);
                match self.arena.entry(next) {
                    Some(entry) if entry.key.as_str() < key => current = next,
                    _ => break,
                }
            }
            history[level] = current;
        }

        self.arena.next(current, 0)
    }

    fn is_match(&self, idx: Idx, key: &str) -> bool {
        self.arena.entry(idx).is_some_and(|entry| entry.key == key)
    }

    fn find(&self, key: &str) -> Option<Idx> {
        let mut history = History::new();
        let candidate = self.search(key, &mut history);
        self.is_match(candidate, key).then_some(candidate)
    }

    // --- Lookup ---

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.find(key).and_then(|idx| self.arena.entry(idx))
    }

    pub fn get_value(&self, key: &str) -> Option<&[u8]> {
        self.get(key).map(Entry::value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Cursor positioned on `key`, if present.
    pub fn cursor(&self, key: &str) -> Option<Cursor<'_>> {
        self.find(key).and_then(|idx| Cursor::at(self, idx))
    }

    // --- Mutation ---

    /// Insert `key`, or replace its value if it is already present.
    ///
    /// Returns the previous value on replacement. A replaced value keeps its
    /// node, height and position; only `size` moves, by the difference in
    /// value length.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Option<Vec<u8>> {
        let key = key.into();
        let value = value.into();

        let mut history = History::new();
        let candidate = self.search(&key, &mut history);

        if let Some(entry) = self
            .arena
            .node_mut(candidate)
            .entry
            .as_mut()
            .filter(|entry| entry.key == key)
        {
            let old = std::mem::replace(&mut entry.value, value);
            self.size -= old.len() as u64;
            self.size += entry.value.len() as u64;
            return Some(old);
        }

        self.insert_after(&history, Entry { key, value });
        None
    }

    /// Allocate a node with a fresh random height and splice it after the
    /// recorded predecessor at each of its levels.
    fn insert_after(&mut self, history: &History, entry: Entry) -> Idx {
        let height = self.levels.next_level();

        #[cfg(feature = "tracing")]
        tracing::trace!(key = %entry.key, height, "insert node");

        self.size += entry.footprint();
        let idx = self.arena.alloc(entry, height);
        for (level, &pred) in history.iter().enumerate().take(height) {
            self.arena.splice_after(pred, idx, level);
        }
        self.len += 1;
        idx
    }

    /// Remove `key` and return its entry. Absent keys are a no-op.
    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        let idx = self.find(key)?;
        self.remove_node(idx)
    }

    fn remove_node(&mut self, idx: Idx) -> Option<Entry> {
        let height = self.arena.node(idx).height();
        for level in 0..height {
            self.arena.unlink(idx, level);
        }
        let entry = self.arena.release(idx)?;

        #[cfg(feature = "tracing")]
        tracing::trace!(key = %entry.key, height, "remove node");

        self.len -= 1;
        self.size -= entry.footprint();
        Some(entry)
    }

    /// Remove every entry. Max level and the level generator are kept.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.len = 0;
        self.size = 0;
    }

    // --- Traversal ---

    /// First entry in key order.
    pub fn front(&self) -> Option<Cursor<'_>> {
        Cursor::at(self, self.arena.next(HEAD, 0))
    }

    /// Last entry in key order.
    pub fn back(&self) -> Option<Cursor<'_>> {
        Cursor::at(self, self.arena.prev(TAIL, 0))
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self, self.arena.next(HEAD, 0), self.arena.prev(TAIL, 0), self.len)
    }

    pub(crate) fn arena(&self) -> &Arena {
        &self.arena
    }

    /// The entry after the one `handle` was taken from.
    ///
    /// If that node has been removed since, falls back to the first entry
    /// whose key is greater than `key`.
    pub(crate) fn next_after(&self, handle: Handle, key: &str) -> Option<Cursor<'_>> {
        if self.arena.is_live(handle) {
            return Cursor::at(self, self.arena.next(handle.index, 0));
        }
        let mut history = History::new();
        let candidate = self.search(key, &mut history);
        let idx = if self.is_match(candidate, key) {
            self.arena.next(candidate, 0)
        } else {
            candidate
        };
        Cursor::at(self, idx)
    }

    /// Mirror of `next_after`: the entry before, or the last entry whose key
    /// is less than `key`.
    pub(crate) fn prev_before(&self, handle: Handle, key: &str) -> Option<Cursor<'_>> {
        if self.arena.is_live(handle) {
            return Cursor::at(self, self.arena.prev(handle.index, 0));
        }
        let mut history = History::new();
        self.search(key, &mut history);
        Cursor::at(self, history[0])
    }

    // --- Introspection ---

    /// Number of entries linked at `level`. Level 0 holds every entry;
    /// levels at or above `max_level` hold none.
    pub fn level_len(&self, level: usize) -> usize {
        if level >= self.max_level {
            return 0;
        }
        let mut count = 0;
        let mut idx = self.arena.next(HEAD, level);
        while idx != TAIL {
            count += 1;
            idx = self.arena.next(idx, level);
        }
        count
    }

    /// Walk every level and panic if the structure is inconsistent.
    ///
    /// Checks key order, prev/next symmetry, that each level holds exactly
    /// the nodes tall enough for it, and the `len`/`size` counters. Costs
    /// O(n * max_level); meant for tests.
    pub fn check_invariants(&self) {
        let mut tall = vec![0usize; self.max_level];
        let mut count = 0usize;
        let mut size = 0u64;

        for level in 0..self.max_level {
            let mut prev = HEAD;
            let mut prev_key: Option<&str> = None;
            let mut at_level = 0usize;
            let mut idx = self.arena.next(HEAD, level);

            while idx != TAIL {
                assert_ne!(idx, NULL, "INVARIANT VIOLATED: level {} chain is broken", level);
                let node = self.arena.node(idx);
                let entry = match node.entry.as_ref() {
                    Some(entry) => entry,
                    None => panic!("INVARIANT VIOLATED: empty slot {} linked at level {}", idx, level),
                };
                let height = node.height();
                assert!(
                    height > level && height <= self.max_level,
                    "INVARIANT VIOLATED: node {:?} of height {} linked at level {}",
                    entry.key,
                    height,
                    level
                );
                assert_eq!(
                    self.arena.prev(idx, level),
                    prev,
                    "INVARIANT VIOLATED: prev link of {:?} at level {} is not its predecessor",
                    entry.key,
                    level
                );
                if let Some(prev_key) = prev_key {
                    assert!(
                        prev_key < entry.key.as_str(),
                        "INVARIANT VIOLATED: {:?} follows {:?} at level {}",
                        entry.key,
                        prev_key,
                        level
                    );
                }

                if level == 0 {
                    count += 1;
                    size += entry.footprint();
                    for slot in tall.iter_mut().take(height) {
                        *slot += 1;
                    }
                }
                at_level += 1;
                prev = idx;
                prev_key = Some(entry.key.as_str());
                idx = self.arena.next(idx, level);
            }

            assert_eq!(
                self.arena.prev(TAIL, level),
                prev,
                "INVARIANT VIOLATED: tail prev link at level {} is stale",
                level
            );
            assert_eq!(
                at_level, tall[level],
                "INVARIANT VIOLATED: level {} links {} nodes but {} are tall enough",
                level, at_level, tall[level]
            );
        }

        assert_eq!(
            count, self.len,
            "INVARIANT VIOLATED: level 0 holds {} entries != len()={}",
            count, self.len
        );
        assert_eq!(
            size, self.size,
            "INVARIANT VIOLATED: sum of entry bytes={} != size()={}",
            size, self.size
        );
    }
}

impl Default for SkipMap {
    fn default() -> Self {
        SkipMap::new(crate::config::DEFAULT_MAX_LEVEL)
    }
}

impl fmt::Debug for SkipMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a SkipMap {
    type Item = &'a Entry;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl<K: Into<String>, V: Into<Vec<u8>>> Extend<(K, V)> for SkipMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}
