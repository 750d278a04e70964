//! Level-0 traversal: cursors and iterators.

use std::fmt;
use std::iter::FusedIterator;

use crate::entry::Entry;
use crate::map::SkipMap;
use crate::node::{Handle, Idx};

/// A position on one entry of a [`SkipMap`].
///
/// Cursors borrow the map, so the entry they point at cannot be removed
/// while they are alive. `next` and `prev` return `None` at either end.
#[derive(Clone, Copy)]
pub struct Cursor<'a> {
    map: &'a SkipMap,
    idx: Idx,
    entry: &'a Entry,
}

impl<'a> Cursor<'a> {
    /// Cursor on `idx`, or `None` if `idx` is a sentinel.
    pub(crate) fn at(map: &'a SkipMap, idx: Idx) -> Option<Cursor<'a>> {
        let entry = map.arena().entry(idx)?;
        Some(Cursor { map, idx, entry })
    }

    pub fn entry(&self) -> &'a Entry {
        self.entry
    }

    pub fn key(&self) -> &'a str {
        &self.entry.key
    }

    pub fn value(&self) -> &'a [u8] {
        &self.entry.value
    }

    /// Number of levels this entry's node participates in.
    pub fn height(&self) -> usize {
        self.map.arena().node(self.idx).height()
    }

    pub fn next(&self) -> Option<Cursor<'a>> {
        Cursor::at(self.map, self.map.arena().next(self.idx, 0))
    }

    pub fn prev(&self) -> Option<Cursor<'a>> {
        Cursor::at(self.map, self.map.arena().prev(self.idx, 0))
    }

    pub(crate) fn handle(&self) -> Handle {
        self.map.arena().handle(self.idx)
    }
}

impl fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("entry", self.entry)
            .field("height", &self.height())
            .finish()
    }
}

/// Iterator over the entries of a [`SkipMap`] in key order.
///
/// Double-ended: `next_back` walks from the largest key down.
pub struct Iter<'a> {
    map: &'a SkipMap,
    front: Idx,
    back: Idx,
    remaining: usize,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(map: &'a SkipMap, front: Idx, back: Idx, remaining: usize) -> Iter<'a> {
        Iter {
            map,
            front,
            back,
            remaining,
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let arena = self.map.arena();
        let entry = arena.entry(self.front)?;
        self.front = arena.next(self.front, 0);
        self.remaining -= 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let arena = self.map.arena();
        let entry = arena.entry(self.back)?;
        self.back = arena.prev(self.back, 0);
        self.remaining -= 1;
        Some(entry)
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}
