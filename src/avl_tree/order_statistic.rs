use core::ops::Index;

use super::AvlTree;
use crate::Rank;
use crate::raw::NodeId;

impl AvlTree {
    /// Returns the node at one-based `rank` in sorted order: rank 1 is the
    /// smallest key. Returns `None` if `rank` is 0 or exceeds the tree size.
    ///
    /// # Examples
    ///
    /// ```
    /// use ravl_tree::AvlTree;
    ///
    /// let tree: AvlTree = [10, 20, 30].into_iter().collect();
    ///
    /// assert_eq!(tree.node_at_rank(2).map(|n| tree.key(n)), Some(20));
    /// assert!(tree.node_at_rank(0).is_none());
    /// assert!(tree.node_at_rank(4).is_none());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn node_at_rank(&self, rank: usize) -> Option<NodeId> {
        self.raw.node_at_rank(rank)
    }

    /// Returns the one-based rank of `key` in sorted order, or `None` if the
    /// key is not present.
    ///
    /// # Examples
    ///
    /// ```
    /// use ravl_tree::AvlTree;
    ///
    /// let tree: AvlTree = [10, 20, 30].into_iter().collect();
    ///
    /// assert_eq!(tree.rank_of(20), Some(2));
    /// assert_eq!(tree.rank_of(15), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn rank_of(&self, key: i64) -> Option<usize> {
        self.raw.rank_of(key)
    }

    /// Returns the node `steps` positions ahead of `node` in sorted order,
    /// or `None` if that runs past the maximum. `steps == 0` returns `node`
    /// itself.
    ///
    /// Equivalent to `steps` successor calls, but navigates by subtree
    /// counts, so a jump of any length costs O(log n) rather than O(steps).
    ///
    /// # Panics
    ///
    /// Panics if `node` has been invalidated.
    ///
    /// # Examples
    ///
    /// ```
    /// use ravl_tree::AvlTree;
    ///
    /// let tree: AvlTree = (1..=7).collect();
    /// let three = tree.find(3).unwrap();
    ///
    /// assert_eq!(tree.nth_successor(three, 2).map(|n| tree.key(n)), Some(5));
    /// assert_eq!(tree.nth_successor(three, 0), Some(three));
    /// assert!(tree.nth_successor(three, 10).is_none());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn nth_successor(&self, node: NodeId, steps: usize) -> Option<NodeId> {
        self.raw.nth_successor(node, steps)
    }
}

/// Indexes into the tree by rank (one-based).
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
///
/// # Examples
///
/// ```
/// use ravl_tree::{AvlTree, Rank};
///
/// let tree: AvlTree = [10, 20, 30].into_iter().collect();
/// assert_eq!(tree[Rank(2)], 20);
/// ```
impl Index<Rank> for AvlTree {
    type Output = i64;

    fn index(&self, rank: Rank) -> &Self::Output {
        let node = self.node_at_rank(rank.0).expect("rank out of bounds");
        &self.raw.node(node).key
    }
}
