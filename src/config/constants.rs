//! # mossdb Configuration Constants
//!
//! This module centralizes the constants that define the on-disk page format.
//! They are part of the format: changing any of them produces pages that an
//! engine built with the old values cannot read.
//!
//! ## Dependency Graph
//!
//! ```text
//! PAGE_SIZE (4096 bytes)
//!       │
//!       ├─> PAGE_HEADER_SIZE (4 bytes: type u16 + nkeys u16)
//!       │
//!       ├─> MAX_KEY_SIZE / MAX_VAL_SIZE
//!       │     A single record (8-byte ptr slot + 2-byte offset + 4-byte
//!       │     length prefix + key + value) must fit in one page, or the
//!       │     split routines cannot terminate. Enforced below.
//!       │
//!       └─> MERGE_THRESHOLD (PAGE_SIZE / 4)
//!             Nodes at or below a quarter page become merge candidates
//!             after a delete. Affects rebalancing frequency only.
//! ```

/// Size of each tree page in bytes. Also the unit of copy-on-write
/// replacement: mutations produce whole new pages of this size.
pub const PAGE_SIZE: usize = 4096;

/// Size of the page header: node type (u16 LE) followed by the record
/// count (u16 LE).
pub const PAGE_HEADER_SIZE: usize = 4;

/// Maximum key length accepted by the tree.
pub const MAX_KEY_SIZE: usize = 1000;

/// Maximum value length accepted by the tree.
pub const MAX_VAL_SIZE: usize = 3000;

/// A node whose live bytes are at or below this threshold is a candidate
/// for merging with a sibling after a delete.
pub const MERGE_THRESHOLD: usize = PAGE_SIZE / 4;

/// Reserved page pointer meaning "no page". The store never hands it out,
/// and a tree whose root is `NO_PAGE` is empty.
pub const NO_PAGE: u64 = 0;

const _: () = assert!(
    PAGE_HEADER_SIZE + 8 + 2 + 4 + MAX_KEY_SIZE + MAX_VAL_SIZE <= PAGE_SIZE,
    "a single maximum-size record must fit in one page"
);

const _: () = assert!(
    MERGE_THRESHOLD < PAGE_SIZE,
    "merge threshold must leave room for the merged page"
);
