//! # Internal-Node Splice
//!
//! After a recursive child mutation returns, the parent internal node is
//! rebuilt copy-on-write with the new child pointer(s) spliced in. The
//! separator key written for each child is always that child's first key,
//! which keeps the smallest-key-in-subtree invariant: `key(i)` of an
//! internal node equals `key(0)` of the page behind `ptr(i)`, all the way
//! down to the sentinel on the leftmost spine.

use crate::storage::PageStore;

use super::node::{Node, NodeRef, NodeType};

/// Replace the child at `idx` with `kids`, registering each kid with the
/// store and using its first key as the separator. `kids` is the output of
/// the split pass, so it holds one to three pages.
pub fn replace_children<S: PageStore>(
    store: &mut S,
    new: &mut Node,
    old: NodeRef<'_>,
    idx: u16,
    kids: &[Node],
) {
    assert!(
        idx < old.nkeys(),
        "child index {} out of range (nkeys = {})",
        idx,
        old.nkeys()
    );
    let inc = kids.len() as u16;

    new.set_header(NodeType::Internal, old.nkeys() + inc - 1);
    new.append_range(old, 0, 0, idx);
    for (i, kid) in kids.iter().enumerate() {
        let ptr = store.alloc(kid.as_page());
        new.append_kv(idx + i as u16, ptr, kid.key(0), &[]);
    }
    new.append_range(old, idx + inc, idx + 1, old.nkeys() - (idx + 1));
}

/// Replace the two adjacent children at `idx` and `idx + 1` with a single
/// `(ptr, key)` entry. Used after two siblings were merged into one page.
pub fn replace_two_children(new: &mut Node, old: NodeRef<'_>, idx: u16, ptr: u64, key: &[u8]) {
    assert!(
        idx + 1 < old.nkeys(),
        "child pair {}..{} out of range (nkeys = {})",
        idx,
        idx + 2,
        old.nkeys()
    );

    new.set_header(NodeType::Internal, old.nkeys() - 1);
    new.append_range(old, 0, 0, idx);
    new.append_kv(idx, ptr, key, &[]);
    new.append_range(old, idx + 1, idx + 2, old.nkeys() - (idx + 2));
}
