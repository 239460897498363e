//! # Copy-on-Write B+Tree
//!
//! This module implements the tree engine on top of the [`PageStore`]
//! contract: a B+Tree of fixed-size pages in which every mutation builds
//! new pages and frees the ones it replaces, never writing in place.
//!
//! ## Layers
//!
//! - [`node`]: the page codec (header, pointer and offset arrays, packed
//!   records), bounded search, record append and range copy, and the
//!   split/merge routines. Everything below the tree logic is byte-slice
//!   arithmetic on single pages.
//! - [`leaf`]: copy-on-write insert/update/delete of one record in a leaf.
//! - [`internal`]: splicing replacement children (and their separator
//!   keys) into a parent node.
//! - [`tree`]: the recursive driver and the public [`BTree`] API.
//!
//! ## Copy-on-Write Discipline
//!
//! A mutation walks down to a leaf, then rebuilds one node per level on the
//! way back up. Intermediate nodes may temporarily exceed the page size;
//! [`node::split3`] cuts them into one to three page-sized pieces before
//! they are registered with the store. Old pages are freed only after
//! their replacements are registered, so the root pointer update is the
//! operation's commit point.
//!
//! [`PageStore`]: crate::storage::PageStore

pub mod internal;
pub mod leaf;
pub mod node;
pub mod tree;

pub use node::{Node, NodeRef, NodeType};
pub use tree::BTree;
