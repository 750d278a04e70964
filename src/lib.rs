//! skipkv - an ordered in-memory key-value skip list.
//!
//! Keys are strings ordered by their bytes, values are byte vectors. Search,
//! insert, update and remove run in expected O(log n); entries can be walked
//! in key order from either end.
//!
//! Two types expose the structure:
//!
//! - [`SkipMap`]: the list itself. Mutation takes `&mut self`.
//! - [`SkipList`]: a `SkipMap` behind one lock, for sharing across threads.
//!
//! # Quick Start
//!
//! ```
//! use skipkv::SkipList;
//!
//! let list = SkipList::new(5);
//! list.set("b", "2");
//! list.set("a", "1");
//! list.set("c", "3");
//!
//! let a = list.front().unwrap();
//! assert_eq!(a.key(), "a");
//! let b = list.next(&a).unwrap();
//! assert_eq!(b.value(), b"2");
//!
//! list.remove("b");
//! assert!(list.get("b").is_none());
//! assert_eq!(list.len(), 2);
//! assert_eq!(list.size(), 4);
//! ```
//!
//! # Deterministic shapes
//!
//! Node heights are random. Pass a seed to get the same shape on every run:
//!
//! ```
//! use skipkv::{Options, SkipMap};
//!
//! let options = Options::new(12).with_seed(7).with_probability(0.25);
//! let map = SkipMap::with_options(options).unwrap();
//! assert!(map.is_empty());
//! ```
//!
//! # Features
//!
//! - `tracing`: emit `tracing` events when a list is created and when nodes
//!   are inserted or removed.

pub mod config;
pub mod entry;
pub mod iter;
mod level;
pub mod map;
mod node;
pub mod sync;

pub use config::{ConfigError, DEFAULT_MAX_LEVEL, MAX_LEVEL_LIMIT, Options};
pub use entry::Entry;
pub use iter::{Cursor, Iter};
pub use map::SkipMap;
pub use sync::{Position, SkipList};
