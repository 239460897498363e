//! # B+Tree Driver
//!
//! The recursive copy-on-write insert/delete machinery and the public API.
//!
//! ## Mutation Flow
//!
//! ```text
//! insert/delete
//!     │ fetch root
//!     ▼
//! tree_insert / tree_delete     (recursive, one new page per level)
//!     │ child result
//!     ▼
//! split3 (insert) / should_merge (delete)
//!     │ alloc replacements, free replaced pages
//!     ▼
//! parent splice (replace_children / replace_two_children)
//!     │ at the root
//!     ▼
//! grow (root split) or shrink (single remaining child)
//! ```
//!
//! `tree_insert` deliberately returns pages of up to two page sizes; they
//! are legal inside the call stack and illegal at rest, which keeps the
//! split decision at the top of each recursion step instead of inside the
//! leaf mutators.
//!
//! Within every step the replacement pages are registered with the store
//! before the pages they replace are freed, so a durable store can treat
//! the final root update as the commit point.
//!
//! ## The Sentinel
//!
//! The first leaf ever allocated starts with an empty-key record. It is
//! never removed and propagates up the left spine as the leftmost
//! separator, which is what makes `lookup_le` total: every search lands on
//! some record `<=` the key, so descent needs no "before all keys" branch.

use eyre::{ensure, Result};

use crate::config::{
    MAX_KEY_SIZE, MAX_VAL_SIZE, MERGE_THRESHOLD, NO_PAGE, PAGE_HEADER_SIZE, PAGE_SIZE,
};
use crate::storage::PageStore;

use super::internal::{replace_children, replace_two_children};
use super::leaf::{leaf_delete, leaf_insert, leaf_update};
use super::node::{node_merge, split3, Node, NodeRef, NodeType};

/// A copy-on-write B+Tree over a page store.
///
/// The tree owns the store and a single root pointer; everything else lives
/// in pages. `root == NO_PAGE` means the tree is empty and is the state
/// before the first insert.
#[derive(Debug)]
pub struct BTree<S: PageStore> {
    store: S,
    root: u64,
}

/// Merge decision for an undersized child: which sibling (if any) it can
/// be folded into. The sibling page travels with the decision, so taking
/// a direction without a sibling cannot be expressed.
enum Merge {
    No,
    Left(Node),
    Right(Node),
}

impl<S: PageStore> BTree<S> {
    /// An empty tree over `store`.
    pub fn new(store: S) -> Self {
        Self {
            store,
            root: NO_PAGE,
        }
    }

    /// A tree over an existing root, e.g. one recovered by a durable store.
    pub fn open(store: S, root: u64) -> Self {
        Self { store, root }
    }

    /// The current root pointer. `NO_PAGE` for an empty tree; changes on
    /// every mutation (the commit point for a durable store).
    pub fn root_ptr(&self) -> u64 {
        self.root
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn fetch(&self, ptr: u64) -> Node {
        Node::from_bytes(self.store.get(ptr))
    }

    /// Insert a key/value pair, or update the value of an existing key.
    ///
    /// # Errors
    ///
    /// Rejects an empty key (the key space below all real keys is reserved
    /// for the sentinel record) and keys or values over the size limits.
    /// The tree is untouched on error.
    pub fn insert(&mut self, key: &[u8], val: &[u8]) -> Result<()> {
        ensure!(!key.is_empty(), "key must not be empty");
        ensure!(
            key.len() <= MAX_KEY_SIZE,
            "key of {} bytes exceeds maximum {}",
            key.len(),
            MAX_KEY_SIZE
        );
        ensure!(
            val.len() <= MAX_VAL_SIZE,
            "value of {} bytes exceeds maximum {}",
            val.len(),
            MAX_VAL_SIZE
        );

        if self.root == NO_PAGE {
            // First insert: the sentinel record covers the low end of the
            // key space so that every later lookup finds a record <= key.
            let mut root = Node::page();
            root.set_header(NodeType::Leaf, 2);
            root.append_kv(0, 0, b"", b"");
            root.append_kv(1, 0, key, val);
            self.root = self.store.alloc(root.as_page());
            return Ok(());
        }

        let updated = self.tree_insert(self.fetch(self.root), key, val);
        let parts = split3(updated);
        let old_root = self.root;

        if parts.len() > 1 {
            // Root split: the tree grows one level.
            let mut root = Node::page();
            root.set_header(NodeType::Internal, parts.len() as u16);
            for (i, part) in parts.iter().enumerate() {
                let ptr = self.store.alloc(part.as_page());
                root.append_kv(i as u16, ptr, part.key(0), b"");
            }
            self.root = self.store.alloc(root.as_page());
        } else {
            self.root = self.store.alloc(parts[0].as_page());
        }
        self.store.free(old_root);
        Ok(())
    }

    /// Delete a key. Returns whether the key was present.
    ///
    /// # Errors
    ///
    /// Rejects the empty key, which never names a real record.
    pub fn delete(&mut self, key: &[u8]) -> Result<bool> {
        ensure!(!key.is_empty(), "key must not be empty");

        if self.root == NO_PAGE {
            return Ok(false);
        }
        let Some(updated) = self.tree_delete(self.fetch(self.root), key) else {
            return Ok(false);
        };

        let old_root = self.root;
        if updated.btype() == NodeType::Internal && updated.nkeys() == 1 {
            // Root with a single remaining child: the tree shrinks one
            // level. The child is already registered; promote its pointer.
            self.root = updated.get_ptr(0);
        } else {
            self.root = self.store.alloc(updated.as_page());
        }
        self.store.free(old_root);
        Ok(true)
    }

    /// Look up the value stored under `key`.
    ///
    /// Read-only descent over borrowed pages; nothing is copied until the
    /// value itself.
    pub fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        if key.is_empty() || self.root == NO_PAGE {
            return None;
        }

        let mut page = self.store.get(self.root);
        loop {
            let node = NodeRef::new(page);
            let idx = node.lookup_le(key);
            match node.btype() {
                NodeType::Leaf => {
                    return (node.key(idx) == key).then(|| node.val(idx).to_vec());
                }
                NodeType::Internal => {
                    page = self.store.get(node.get_ptr(idx));
                }
            }
        }
    }

    /// Recursive insert. Returns the replacement for `node`, which may be
    /// up to twice the page size; the caller splits it before storing.
    fn tree_insert(&mut self, node: Node, key: &[u8], val: &[u8]) -> Node {
        let mut new = Node::scratch();
        let idx = node.lookup_le(key);

        match node.btype() {
            NodeType::Leaf => {
                if node.key(idx) == key {
                    leaf_update(&mut new, node.view(), idx, key, val);
                } else {
                    leaf_insert(&mut new, node.view(), idx + 1, key, val);
                }
            }
            NodeType::Internal => {
                let kptr = node.get_ptr(idx);
                let updated = self.tree_insert(self.fetch(kptr), key, val);
                let parts = split3(updated);
                replace_children(&mut self.store, &mut new, node.view(), idx, &parts);
                self.store.free(kptr);
            }
        }
        new
    }

    /// Recursive delete. `None` means the key was not found and nothing
    /// changed; `Some` carries the replacement for `node`, which may have
    /// zero records when the subtree emptied out.
    fn tree_delete(&mut self, node: Node, key: &[u8]) -> Option<Node> {
        let idx = node.lookup_le(key);

        match node.btype() {
            NodeType::Leaf => {
                if node.key(idx) != key {
                    return None;
                }
                let mut new = Node::page();
                leaf_delete(&mut new, node.view(), idx);
                Some(new)
            }
            NodeType::Internal => self.node_delete(node, idx, key),
        }
    }

    /// Delete inside the child at `idx` of an internal node, then rebuild
    /// the node, merging the child with a sibling if it fell below the
    /// occupancy threshold.
    fn node_delete(&mut self, node: Node, idx: u16, key: &[u8]) -> Option<Node> {
        let kptr = node.get_ptr(idx);
        let updated = self.tree_delete(self.fetch(kptr), key)?;

        let mut new = Node::page();
        match self.should_merge(node.view(), idx, updated.view()) {
            Merge::Left(sibling) => {
                let sib_ptr = node.get_ptr(idx - 1);
                let mut merged = Node::page();
                node_merge(&mut merged, sibling.view(), updated.view());
                let merged_ptr = self.store.alloc(merged.as_page());
                replace_two_children(&mut new, node.view(), idx - 1, merged_ptr, merged.key(0));
                self.store.free(sib_ptr);
            }
            Merge::Right(sibling) => {
                let sib_ptr = node.get_ptr(idx + 1);
                let mut merged = Node::page();
                node_merge(&mut merged, updated.view(), sibling.view());
                let merged_ptr = self.store.alloc(merged.as_page());
                replace_two_children(&mut new, node.view(), idx, merged_ptr, merged.key(0));
                self.store.free(sib_ptr);
            }
            Merge::No if updated.nkeys() == 0 => {
                // An emptied child with no sibling to fold into can only be
                // an only child; the node becomes empty and the collapse
                // propagates upward.
                assert!(
                    node.nkeys() == 1 && idx == 0,
                    "empty child left behind with siblings present"
                );
                new.set_header(NodeType::Internal, 0);
            }
            Merge::No => {
                replace_children(
                    &mut self.store,
                    &mut new,
                    node.view(),
                    idx,
                    std::slice::from_ref(&updated),
                );
            }
        }
        self.store.free(kptr);
        Some(new)
    }

    /// Decide whether the updated child at `idx` should merge with a
    /// sibling. Only candidates at or below a quarter page are considered,
    /// and only a sibling the merged page would still fit next to; if both
    /// siblings exist but neither fits, the child stays undersized.
    fn should_merge(&self, parent: NodeRef<'_>, idx: u16, updated: NodeRef<'_>) -> Merge {
        if updated.nbytes() > MERGE_THRESHOLD {
            return Merge::No;
        }

        if idx > 0 {
            let sibling = self.fetch(parent.get_ptr(idx - 1));
            let merged_bytes = sibling.nbytes() + updated.nbytes() - PAGE_HEADER_SIZE;
            if merged_bytes <= PAGE_SIZE {
                return Merge::Left(sibling);
            }
        }
        if idx + 1 < parent.nkeys() {
            let sibling = self.fetch(parent.get_ptr(idx + 1));
            let merged_bytes = sibling.nbytes() + updated.nbytes() - PAGE_HEADER_SIZE;
            if merged_bytes <= PAGE_SIZE {
                return Merge::Right(sibling);
            }
        }
        Merge::No
    }
}
