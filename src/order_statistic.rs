/// A one-based rank into the sorted order of a tree.
///
/// Rank 1 is the smallest key; rank `len` is the largest. Ranks follow the
/// subtree-count convention of the tree itself (a node's rank within its
/// subtree is its left subtree size plus one), so rank arithmetic composes
/// directly with [`nth_successor`](crate::AvlTree::nth_successor).
///
/// # Examples
///
/// ```
/// use ravl_tree::{AvlTree, Rank};
///
/// let tree: AvlTree = [30, 10, 20].into_iter().collect();
///
/// assert_eq!(tree[Rank(1)], 10);
/// assert_eq!(tree[Rank(3)], 30);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);
