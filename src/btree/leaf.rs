//! # Leaf Mutators
//!
//! Copy-on-write mutations of a single leaf page. Each routine builds a
//! complete new page from an old one plus the change; the input page is
//! never modified. The result of an insert or update may exceed one page;
//! that is legal inside a mutation and resolved by the split pass before
//! the page reaches the store.

use super::node::{Node, NodeRef, NodeType};

/// Insert a record at `idx`, shifting the records at and after it one slot
/// right.
pub fn leaf_insert(new: &mut Node, old: NodeRef<'_>, idx: u16, key: &[u8], val: &[u8]) {
    assert!(
        idx <= old.nkeys(),
        "leaf insert index {} out of range (nkeys = {})",
        idx,
        old.nkeys()
    );

    new.set_header(NodeType::Leaf, old.nkeys() + 1);
    new.append_range(old, 0, 0, idx);
    new.append_kv(idx, 0, key, val);
    new.append_range(old, idx + 1, idx, old.nkeys() - idx);
}

/// Replace the record at `idx` with a new key/value, keeping the count.
pub fn leaf_update(new: &mut Node, old: NodeRef<'_>, idx: u16, key: &[u8], val: &[u8]) {
    assert!(
        idx < old.nkeys(),
        "leaf update index {} out of range (nkeys = {})",
        idx,
        old.nkeys()
    );

    new.set_header(NodeType::Leaf, old.nkeys());
    new.append_range(old, 0, 0, idx);
    new.append_kv(idx, 0, key, val);
    new.append_range(old, idx + 1, idx + 1, old.nkeys() - idx - 1);
}

/// Remove the record at `idx`, shifting the records after it one slot left.
pub fn leaf_delete(new: &mut Node, old: NodeRef<'_>, idx: u16) {
    assert!(
        old.nkeys() > 0 && idx < old.nkeys(),
        "leaf delete index {} out of range (nkeys = {})",
        idx,
        old.nkeys()
    );

    new.set_header(NodeType::Leaf, old.nkeys() - 1);
    new.append_range(old, 0, 0, idx);
    new.append_range(old, idx, idx + 1, old.nkeys() - idx - 1);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(records: &[(&[u8], &[u8])]) -> Node {
        let mut node = Node::page();
        node.set_header(NodeType::Leaf, records.len() as u16);
        for (i, (key, val)) in records.iter().enumerate() {
            node.append_kv(i as u16, 0, key, val);
        }
        node
    }

    fn entries(node: &Node) -> Vec<(Vec<u8>, Vec<u8>)> {
        (0..node.nkeys())
            .map(|i| (node.key(i).to_vec(), node.val(i).to_vec()))
            .collect()
    }

    fn expect(node: &Node, records: &[(&[u8], &[u8])]) {
        let want: Vec<(Vec<u8>, Vec<u8>)> = records
            .iter()
            .map(|(k, v)| (k.to_vec(), v.to_vec()))
            .collect();
        assert_eq!(entries(node), want);
    }

    #[test]
    fn insert_in_middle() {
        let old = leaf(&[(b"a", b"val_a"), (b"c", b"val_c"), (b"e", b"val_e")]);

        let mut new = Node::page();
        leaf_insert(&mut new, old.view(), 2, b"d", b"val_d");

        assert_eq!(new.btype(), NodeType::Leaf);
        expect(
            &new,
            &[
                (b"a", b"val_a"),
                (b"c", b"val_c"),
                (b"d", b"val_d"),
                (b"e", b"val_e"),
            ],
        );
    }

    #[test]
    fn insert_at_beginning() {
        let old = leaf(&[(b"b", b"val_b"), (b"d", b"val_d")]);

        let mut new = Node::page();
        leaf_insert(&mut new, old.view(), 0, b"a", b"val_a");

        expect(&new, &[(b"a", b"val_a"), (b"b", b"val_b"), (b"d", b"val_d")]);
    }

    #[test]
    fn insert_at_end() {
        let old = leaf(&[(b"a", b"val_a"), (b"b", b"val_b")]);

        let mut new = Node::page();
        leaf_insert(&mut new, old.view(), 2, b"c", b"val_c");

        expect(&new, &[(b"a", b"val_a"), (b"b", b"val_b"), (b"c", b"val_c")]);
    }

    #[test]
    fn insert_into_empty_leaf() {
        let old = leaf(&[]);

        let mut new = Node::page();
        leaf_insert(&mut new, old.view(), 0, b"first", b"val_first");

        expect(&new, &[(b"first", b"val_first")]);
    }

    #[test]
    fn update_in_middle() {
        let old = leaf(&[(b"a", b"val_a"), (b"b", b"val_b"), (b"c", b"val_c")]);

        let mut new = Node::page();
        leaf_update(&mut new, old.view(), 1, b"b", b"new_val_b");

        expect(
            &new,
            &[(b"a", b"val_a"), (b"b", b"new_val_b"), (b"c", b"val_c")],
        );
    }

    #[test]
    fn update_with_longer_value() {
        let old = leaf(&[(b"key1", b"short"), (b"key2", b"val"), (b"key3", b"tiny")]);
        let long = b"this is a much longer value that should still fit".as_slice();

        let mut new = Node::page();
        leaf_update(&mut new, old.view(), 1, b"key2", long);

        expect(&new, &[(b"key1", b"short"), (b"key2", long), (b"key3", b"tiny")]);
    }

    #[test]
    fn update_only_key() {
        let old = leaf(&[(b"only", b"old_val")]);

        let mut new = Node::page();
        leaf_update(&mut new, old.view(), 0, b"only", b"new_val");

        expect(&new, &[(b"only", b"new_val")]);
    }

    #[test]
    fn delete_from_middle() {
        let old = leaf(&[
            (b"a", b"val_a"),
            (b"b", b"val_b"),
            (b"c", b"val_c"),
            (b"d", b"val_d"),
        ]);

        let mut new = Node::page();
        leaf_delete(&mut new, old.view(), 2);

        expect(&new, &[(b"a", b"val_a"), (b"b", b"val_b"), (b"d", b"val_d")]);
    }

    #[test]
    fn delete_from_beginning_and_end() {
        let old = leaf(&[(b"x", b"vx"), (b"y", b"vy"), (b"z", b"vz")]);

        let mut no_first = Node::page();
        leaf_delete(&mut no_first, old.view(), 0);
        expect(&no_first, &[(b"y", b"vy"), (b"z", b"vz")]);

        let mut no_last = Node::page();
        leaf_delete(&mut no_last, old.view(), 2);
        expect(&no_last, &[(b"x", b"vx"), (b"y", b"vy")]);
    }

    #[test]
    fn delete_last_record_leaves_empty_leaf() {
        let old = leaf(&[(b"only", b"val_only")]);

        let mut new = Node::page();
        leaf_delete(&mut new, old.view(), 0);

        assert_eq!(new.btype(), NodeType::Leaf);
        assert_eq!(new.nkeys(), 0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn delete_from_empty_leaf_panics() {
        let old = leaf(&[]);
        let mut new = Node::page();
        leaf_delete(&mut new, old.view(), 0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn delete_index_past_end_panics() {
        let old = leaf(&[(b"a", b"1")]);
        let mut new = Node::page();
        leaf_delete(&mut new, old.view(), 1);
    }
}
