//! Node arena and per-level link primitives.
//!
//! Nodes live in a `Vec` and refer to each other by index instead of by
//! pointer. Two sentinels occupy fixed slots and are linked at every level:
//!
//! ```text
//! Level 2: HEAD ----------------------> C -----------> TAIL
//! Level 1: HEAD ------> A ------------> C -----------> TAIL
//! Level 0: HEAD ------> A ----> B ----> C ----> D ---> TAIL
//! ```
//!
//! Every link is doubly connected: `next` at a level has a matching `prev`
//! on the other side. Splicing and unlinking are index rewrites on the two
//! neighbours at one level.

use smallvec::SmallVec;

use crate::entry::Entry;

/// Node index type. u32 saves space vs usize on 64-bit.
pub(crate) type Idx = u32;

/// Slot of the head sentinel.
pub(crate) const HEAD: Idx = 0;

/// Slot of the tail sentinel.
pub(crate) const TAIL: Idx = 1;

/// Null index marker for links that are not wired yet.
pub(crate) const NULL: Idx = Idx::MAX;

/// Links of one node at one level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Link {
    pub prev: Idx,
    pub next: Idx,
}

impl Link {
    const UNLINKED: Link = Link {
        prev: NULL,
        next: NULL,
    };
}

/// Inline capacity for links. Most nodes are 1 or 2 levels tall.
type Links = SmallVec<[Link; 4]>;

pub(crate) struct Node {
    /// `None` for sentinels and for slots sitting on the free list.
    pub entry: Option<Entry>,
    /// One link per level; `links.len()` is the node's height.
    pub links: Links,
    /// Bumped every time the slot is released.
    pub generation: u32,
}

impl Node {
    fn sentinel(height: usize) -> Node {
        Node {
            entry: None,
            links: SmallVec::from_elem(Link::UNLINKED, height),
            generation: 0,
        }
    }

    pub fn height(&self) -> usize {
        self.links.len()
    }
}

/// Identifies one incarnation of a node slot.
///
/// A handle stays valid until the node is removed. After that the slot's
/// generation moves on and `Arena::is_live` reports the handle as stale,
/// even if the slot has been reused by a later insert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Handle {
    pub(crate) index: Idx,
    pub(crate) generation: u32,
}

pub(crate) struct Arena {
    nodes: Vec<Node>,
    /// Released slots available for reuse.
    free_list: Vec<Idx>,
}

impl Arena {
    /// Create an arena holding only the two sentinels, linked head to tail
    /// at every level.
    pub fn new(max_level: usize) -> Arena {
        let mut arena = Arena {
            nodes: Vec::with_capacity(2),
            free_list: Vec::new(),
        };
        arena.nodes.push(Node::sentinel(max_level));
        arena.nodes.push(Node::sentinel(max_level));
        arena.link_sentinels();
        arena
    }

    fn link_sentinels(&mut self) {
        for link in self.nodes[HEAD as usize].links.iter_mut() {
            *link = Link {
                prev: NULL,
                next: TAIL,
            };
        }
        for link in self.nodes[TAIL as usize].links.iter_mut() {
            *link = Link {
                prev: HEAD,
                next: NULL,
            };
        }
    }

    pub fn node(&self, idx: Idx) -> &Node {
        &self.nodes[idx as usize]
    }

    pub fn node_mut(&mut self, idx: Idx) -> &mut Node {
        &mut self.nodes[idx as usize]
    }

    /// Entry of a real node. Sentinels and free slots have none.
    pub fn entry(&self, idx: Idx) -> Option<&Entry> {
        self.node(idx).entry.as_ref()
    }

    pub fn next(&self, idx: Idx, level: usize) -> Idx {
        self.node(idx).links[level].next
    }

    pub fn prev(&self, idx: Idx, level: usize) -> Idx {
        self.node(idx).links[level].prev
    }

    pub fn handle(&self, idx: Idx) -> Handle {
        Handle {
            index: idx,
            generation: self.node(idx).generation,
        }
    }

    /// Whether the handle still names a linked, real node.
    pub fn is_live(&self, handle: Handle) -> bool {
        match self.nodes.get(handle.index as usize) {
            Some(node) => node.generation == handle.generation && node.entry.is_some(),
            None => false,
        }
    }

    /// Number of slots ever allocated, sentinels included.
    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Allocate an unlinked node, reusing a released slot if there is one.
    pub fn alloc(&mut self, entry: Entry, height: usize) -> Idx {
        if let Some(idx) = self.free_list.pop() {
            let node = self.node_mut(idx);
            node.entry = Some(entry);
            node.links.clear();
            node.links.resize(height, Link::UNLINKED);
            idx
        } else {
            let idx = self.nodes.len() as Idx;
            self.nodes.push(Node {
                entry: Some(entry),
                links: SmallVec::from_elem(Link::UNLINKED, height),
                generation: 0,
            });
            idx
        }
    }

    /// Return an unlinked node's slot to the free list and hand back its entry.
    ///
    /// The caller must have unlinked the node at every level first.
    pub fn release(&mut self, idx: Idx) -> Option<Entry> {
        let node = self.node_mut(idx);
        let entry = node.entry.take();
        node.links.clear();
        node.generation = node.generation.wrapping_add(1);
        self.free_list.push(idx);
        entry
    }

    /// Wire `idx` in directly after `pred` at `level`.
    pub fn splice_after(&mut self, pred: Idx, idx: Idx, level: usize) {
        let succ = self.next(pred, level);
        self.node_mut(idx).links[level] = Link { prev: pred, next: succ };
        self.node_mut(pred).links[level].next = idx;
        self.node_mut(succ).links[level].prev = idx;
    }

    /// Bridge the neighbours of `idx` at `level` over it.
    pub fn unlink(&mut self, idx: Idx, level: usize) {
        let Link { prev, next } = self.node(idx).links[level];
        self.node_mut(prev).links[level].next = next;
        self.node_mut(next).links[level].prev = prev;
        self.node_mut(idx).links[level] = Link::UNLINKED;
    }

    /// Release every real node and relink the sentinels.
    ///
    /// Slots are kept and moved to the free list so that handles taken
    /// before the clear stay stale after their slots are reused.
    pub fn clear(&mut self) {
        self.free_list.clear();
        for idx in (2..self.nodes.len() as Idx).rev() {
            let node = self.node_mut(idx);
            if node.entry.take().is_some() {
                node.generation = node.generation.wrapping_add(1);
            }
            node.links.clear();
            self.free_list.push(idx);
        }
        self.link_sentinels();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(arena: &Arena, level: usize) -> Vec<Idx> {
        let mut out = Vec::new();
        let mut idx = arena.next(HEAD, level);
        while idx != TAIL {
            out.push(idx);
            idx = arena.next(idx, level);
        }
        out
    }

    #[test]
    fn sentinels_linked_at_every_level() {
        let arena = Arena::new(4);
        for level in 0..4 {
            assert_eq!(arena.next(HEAD, level), TAIL);
            assert_eq!(arena.prev(TAIL, level), HEAD);
        }
        assert_eq!(arena.capacity(), 2);
    }

    #[test]
    fn splice_and_unlink() {
        let mut arena = Arena::new(2);
        let a = arena.alloc(Entry::new("a", "1"), 2);
        let b = arena.alloc(Entry::new("b", "2"), 1);

        arena.splice_after(HEAD, a, 0);
        arena.splice_after(HEAD, a, 1);
        arena.splice_after(a, b, 0);

        assert_eq!(chain(&arena, 0), vec![a, b]);
        assert_eq!(chain(&arena, 1), vec![a]);
        assert_eq!(arena.prev(TAIL, 0), b);
        assert_eq!(arena.prev(b, 0), a);

        arena.unlink(a, 0);
        arena.unlink(a, 1);
        assert_eq!(chain(&arena, 0), vec![b]);
        assert_eq!(chain(&arena, 1), Vec::<Idx>::new());
        assert_eq!(arena.prev(b, 0), HEAD);
        assert_eq!(arena.prev(TAIL, 1), HEAD);
    }

    #[test]
    fn released_slot_is_reused_with_new_generation() {
        let mut arena = Arena::new(1);
        let a = arena.alloc(Entry::new("a", "1"), 1);
        arena.splice_after(HEAD, a, 0);
        let old = arena.handle(a);
        assert!(arena.is_live(old));

        arena.unlink(a, 0);
        let entry = arena.release(a);
        assert_eq!(entry, Some(Entry::new("a", "1")));
        assert!(!arena.is_live(old));

        let b = arena.alloc(Entry::new("b", "2"), 1);
        assert_eq!(b, a);
        assert!(!arena.is_live(old));
        assert!(arena.is_live(arena.handle(b)));
        assert_eq!(arena.capacity(), 3);
    }

    #[test]
    fn sentinel_handles_are_not_live() {
        let arena = Arena::new(1);
        assert!(!arena.is_live(arena.handle(HEAD)));
        assert!(!arena.is_live(arena.handle(TAIL)));
    }

    #[test]
    fn clear_relinks_sentinels_and_recycles_slots() {
        let mut arena = Arena::new(3);
        for (i, key) in ["a", "b", "c"].iter().enumerate() {
            let idx = arena.alloc(Entry::new(*key, Vec::new()), 1);
            let pred = if i == 0 { HEAD } else { idx - 1 };
            arena.splice_after(pred, idx, 0);
        }
        assert_eq!(chain(&arena, 0).len(), 3);
        let first = arena.handle(2);

        arena.clear();
        for level in 0..3 {
            assert_eq!(arena.next(HEAD, level), TAIL);
            assert_eq!(arena.prev(TAIL, level), HEAD);
        }

        // Slots are recycled lowest first, and old handles stay stale.
        let reused = arena.alloc(Entry::new("z", Vec::new()), 1);
        assert_eq!(reused, 2);
        assert!(!arena.is_live(first));
        assert_eq!(arena.capacity(), 5);
    }
}
