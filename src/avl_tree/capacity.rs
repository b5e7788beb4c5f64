use super::AvlTree;
use crate::raw::RawAvlTree;

impl AvlTree {
    /// Creates an empty tree with room for at least `capacity` nodes before
    /// the arena reallocates.
    ///
    /// # Examples
    ///
    /// ```
    /// use ravl_tree::AvlTree;
    ///
    /// let tree = AvlTree::with_capacity(16);
    /// assert!(tree.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        AvlTree {
            raw: RawAvlTree::with_capacity(capacity),
        }
    }

    /// Returns the number of nodes the tree can hold without reallocating.
    ///
    /// # Examples
    ///
    /// ```
    /// use ravl_tree::AvlTree;
    ///
    /// let tree = AvlTree::with_capacity(32);
    /// assert_eq!(tree.capacity(), 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
