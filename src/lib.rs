//! A rank-augmented AVL tree for Rust.
//!
//! This crate provides [`AvlTree`], a height-balanced binary search tree over
//! unique `i64` keys with O(log n) order-statistic operations:
//!
//! - [`node_at_rank`](AvlTree::node_at_rank) - Get the node at a given sorted position
//! - [`rank_of`](AvlTree::rank_of) - Get the sorted position of a key
//! - [`nth_successor`](AvlTree::nth_successor) - Jump `n` steps forward in sorted order
//! - Indexing by [`Rank`] - e.g., `tree[Rank(1)]` for the smallest key
//!
//! # Example
//!
//! ```
//! use ravl_tree::{AvlTree, Rank};
//!
//! let mut tree = AvlTree::new();
//! let ten = tree.insert(10).unwrap();
//! tree.insert(6).unwrap();
//! tree.insert(20).unwrap();
//!
//! // Membership and navigation.
//! assert!(tree.contains(6));
//! assert_eq!(tree.successor(ten).map(|n| tree.key(n)), Some(20));
//!
//! // Order-statistic operations (O(log n), ranks are 1-based).
//! assert_eq!(tree[Rank(1)], 6);
//! assert_eq!(tree.rank_of(20), Some(3));
//!
//! // Duplicate keys are rejected, the tree is unchanged.
//! assert!(tree.insert(10).is_err());
//! assert_eq!(tree.len(), 3);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **O(log n) rank operations** - Efficient order-statistic queries via subtree count augmentation
//! - **Stable node handles** - [`NodeId`]s survive rotations and unrelated mutations
//! - **No unsafe code** - The node graph lives in an index arena, not behind raw pointers
//!
//! # Implementation
//!
//! The tree is a classic AVL tree (rotation-based rebalancing, height difference
//! between sibling subtrees bounded by 1) whose nodes carry left/right subtree
//! counts, a parent back-reference, and a tri-state side marker for O(1)
//! parent-side determination during rotations and upward walks.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod order_statistic;
mod raw;

pub mod avl_tree;

pub use avl_tree::{AvlTree, DuplicateKey};
pub use order_statistic::Rank;
pub use raw::NodeId;
