//! # mossdb - Copy-on-Write B+Tree Storage Engine
//!
//! mossdb is a key/value storage engine built around a copy-on-write B+Tree
//! over fixed-size 4KB pages. The tree never writes a page in place: every
//! insert or delete produces new pages along the touched path and frees the
//! replaced ones, which makes old roots naturally snapshot-readable and lets
//! a WAL or MVCC layer be added later without reworking the core.
//!
//! ## Quick Start
//!
//! ```
//! use mossdb::{BTree, MemPageStore};
//!
//! let mut tree = BTree::new(MemPageStore::new());
//! tree.insert(b"hello", b"world").unwrap();
//! assert_eq!(tree.get(b"hello"), Some(b"world".to_vec()));
//! assert!(tree.delete(b"hello").unwrap());
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │      Public API (BTree<S>)          │  insert / delete / get
//! ├─────────────────────────────────────┤
//! │  Tree driver (recursion, root mgmt) │  split-at-the-top, merge-on-delete
//! ├─────────────────────────────────────┤
//! │  Leaf / internal node mutators      │  copy-on-write page builders
//! ├─────────────────────────────────────┤
//! │  Page codec (header, ptrs, records) │  little-endian byte layout
//! ├─────────────────────────────────────┤
//! │  PageStore (get / alloc / free)     │  pluggable backing store
//! └─────────────────────────────────────┘
//! ```
//!
//! The engine is deliberately storage-agnostic: it talks to its pages through
//! the three-operation [`PageStore`] contract. [`MemPageStore`] is the
//! map-backed implementation used by the tests; a durable store (file,
//! mmap, WAL) plugs in behind the same trait and supplies its own
//! concurrency control.
//!
//! ## Module Overview
//!
//! - [`btree`]: page codec, node mutators, split/merge, and the tree driver
//! - [`storage`]: the `PageStore` contract and the in-memory store
//! - [`config`]: page-format constants with compile-time invariant checks
//!
//! ## Concurrency
//!
//! The tree is a single-threaded data structure. Every public operation runs
//! to completion on the caller's thread; the only state carried across
//! operations is the root page pointer. Backing stores that want concurrent
//! readers exploit the copy-on-write property (old pages stay intact until
//! freed) and provide their own synchronization.

pub mod btree;
pub mod config;
pub mod storage;

pub use btree::BTree;
pub use storage::{MemPageStore, PageStore};
