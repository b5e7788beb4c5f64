use core::cmp::Ordering;
use core::fmt::Write;

use alloc::string::String;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::NodeId;
use super::node::{Node, Side};

/// The core AVL tree implementation backing `AvlTree`.
///
/// All structural invariants (BST order, AVL balance, cached heights and
/// subtree counts, side markers, parent back-references) are maintained here;
/// the public wrapper only adds documentation, the error type, and iterators.
#[derive(Clone)]
pub(crate) struct RawAvlTree {
    /// Arena storing all tree nodes.
    nodes: Arena<Node>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<NodeId>,
    /// Total number of keys in the tree.
    len: usize,
}

#[allow(clippy::cast_possible_truncation)]
const fn to_usize(count: u32) -> usize {
    count as usize
}

impl RawAvlTree {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
        }
    }

    /// Creates a new tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            len: 0,
        }
    }

    /// Returns the number of keys in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns the node capacity of the arena.
    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Returns the root handle, if the tree is non-empty.
    pub(crate) const fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Returns a reference to a node by handle.
    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        self.nodes.get(id)
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes.get_mut(id)
    }

    /// Clears all nodes from the tree. Every outstanding `NodeId` is invalidated.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    /// Height of a possibly-absent subtree; an empty subtree has height -1.
    #[inline]
    fn height_of(&self, id: Option<NodeId>) -> i8 {
        match id {
            Some(id) => self.node(id).height,
            None => -1,
        }
    }

    /// Size of a possibly-absent subtree.
    #[inline]
    fn size_of(&self, id: Option<NodeId>) -> u32 {
        match id {
            Some(id) => self.node(id).subtree_size(),
            None => 0,
        }
    }

    /// Recomputes a node's cached height and subtree counts from its children.
    fn refresh(&mut self, id: NodeId) {
        let (left, right) = {
            let n = self.node(id);
            (n.left, n.right)
        };
        let height = 1 + self.height_of(left).max(self.height_of(right));
        let left_count = self.size_of(left);
        let right_count = self.size_of(right);

        let n = self.node_mut(id);
        n.height = height;
        n.left_count = left_count;
        n.right_count = right_count;
    }

    // ─── Balance maintenance ─────────────────────────────────────────────────

    /// Rotates the subtree rooted at `z` to the right: `z`'s left child `y`
    /// takes `z`'s position, `z` becomes `y`'s right child, and `y`'s old
    /// right subtree moves under `z`. Heights and counts are refreshed for
    /// `z` and `y` only; ancestors are the caller's responsibility.
    fn rotate_right(&mut self, z: NodeId) {
        let (parent, z_side) = {
            let n = self.node(z);
            (n.parent, n.side)
        };
        let y = self.node(z).left.expect("`RawAvlTree::rotate_right()` - `z` has no left child!");
        let x = self.node(y).right;

        self.node_mut(z).left = x;
        if let Some(x) = x {
            let n = self.node_mut(x);
            n.parent = Some(z);
            n.side = Side::Left;
        }

        {
            let n = self.node_mut(y);
            n.right = Some(z);
            n.parent = parent;
            n.side = z_side;
        }
        {
            let n = self.node_mut(z);
            n.parent = Some(y);
            n.side = Side::Right;
        }

        match parent {
            Some(p) => self.node_mut(p).set_child(z_side, Some(y)),
            None => self.root = Some(y),
        }

        self.refresh(z);
        self.refresh(y);
    }

    /// Mirror image of [`rotate_right`](Self::rotate_right) using `z`'s right child.
    fn rotate_left(&mut self, z: NodeId) {
        let (parent, z_side) = {
            let n = self.node(z);
            (n.parent, n.side)
        };
        let y = self.node(z).right.expect("`RawAvlTree::rotate_left()` - `z` has no right child!");
        let x = self.node(y).left;

        self.node_mut(z).right = x;
        if let Some(x) = x {
            let n = self.node_mut(x);
            n.parent = Some(z);
            n.side = Side::Right;
        }

        {
            let n = self.node_mut(y);
            n.left = Some(z);
            n.parent = parent;
            n.side = z_side;
        }
        {
            let n = self.node_mut(z);
            n.parent = Some(y);
            n.side = Side::Left;
        }

        match parent {
            Some(p) => self.node_mut(p).set_child(z_side, Some(y)),
            None => self.root = Some(y),
        }

        self.refresh(z);
        self.refresh(y);
    }

    /// Rebalances the node `z` whose children's heights differ by two,
    /// choosing among the four rotation cases by the heights of `z`'s heavy
    /// child's children. A tie on the heavy child takes the single rotation.
    fn fix(&mut self, z: NodeId) {
        let (zl, zr) = {
            let n = self.node(z);
            (n.left, n.right)
        };

        if self.height_of(zl) > self.height_of(zr) {
            let y = zl.expect("`RawAvlTree::fix()` - left-heavy node has no left child!");
            let (yl, yr) = {
                let n = self.node(y);
                (n.left, n.right)
            };
            if self.height_of(yl) >= self.height_of(yr) {
                // left-left heavy
                self.rotate_right(z);
            } else {
                // left-right heavy
                self.rotate_left(y);
                self.rotate_right(z);
            }
        } else {
            let y = zr.expect("`RawAvlTree::fix()` - right-heavy node has no right child!");
            let (yl, yr) = {
                let n = self.node(y);
                (n.left, n.right)
            };
            if self.height_of(yr) >= self.height_of(yl) {
                // right-right heavy
                self.rotate_left(z);
            } else {
                // right-left heavy
                self.rotate_right(y);
                self.rotate_left(z);
            }
        }
    }

    /// Walks from `start` up to the root, recomputing heights and subtree
    /// counts and rebalancing every ancestor whose imbalance reaches two.
    /// The walk never stops early: deletions can require several fixes, and
    /// the counts must be refreshed all the way up regardless.
    fn retrace(&mut self, start: Option<NodeId>) {
        let mut cur = start;
        while let Some(id) = cur {
            self.refresh(id);
            let (lh, rh) = {
                let n = self.node(id);
                (self.height_of(n.left), self.height_of(n.right))
            };
            if lh.abs_diff(rh) >= 2 {
                // `fix` rotates `id` downward; its new parent is refreshed on
                // the next iteration of the walk.
                self.fix(id);
            }
            cur = self.node(id).parent;
        }
    }

    // ─── Insertion and deletion ──────────────────────────────────────────────

    /// Inserts a key. Returns the new node's handle, or `None` if the key is
    /// already present (the tree is left untouched).
    pub(crate) fn insert(&mut self, key: i64) -> Option<NodeId> {
        let Some(root) = self.root else {
            let id = self.nodes.alloc(Node::new_leaf(key, Side::Root, None));
            self.root = Some(id);
            self.len = 1;
            return Some(id);
        };

        let mut cur = root;
        let (parent, side) = loop {
            let n = self.node(cur);
            match key.cmp(&n.key) {
                Ordering::Equal => return None,
                Ordering::Less => match n.left {
                    Some(left) => cur = left,
                    None => break (cur, Side::Left),
                },
                Ordering::Greater => match n.right {
                    Some(right) => cur = right,
                    None => break (cur, Side::Right),
                },
            }
        };

        let id = self.nodes.alloc(Node::new_leaf(key, side, Some(parent)));
        self.node_mut(parent).set_child(side, Some(id));
        self.len += 1;
        self.retrace(Some(parent));
        Some(id)
    }

    /// Removes a key. Returns whether the key was present; removing an
    /// absent key is a no-op.
    pub(crate) fn remove(&mut self, key: i64) -> bool {
        let Some(target) = self.find(key) else {
            return false;
        };
        self.remove_node(target);
        true
    }

    fn remove_node(&mut self, target: NodeId) {
        let (left, right) = {
            let n = self.node(target);
            (n.left, n.right)
        };

        let start = if let (Some(_), Some(right)) = (left, right) {
            // Two children: the in-order successor's key survives in
            // `target`; the successor node (which has no left child) is the
            // one physically unlinked.
            let succ = self.min_in_subtree(right);
            let succ_key = self.node(succ).key;
            self.node_mut(target).key = succ_key;
            self.splice(succ)
        } else {
            self.splice(target)
        };

        self.retrace(start);
    }

    /// Unlinks a node with at most one child, splicing the child (if any)
    /// into its position, and frees it. Returns the unlinked node's former
    /// parent, where the rebalancing walk starts.
    fn splice(&mut self, id: NodeId) -> Option<NodeId> {
        let (parent, side, left, right) = {
            let n = self.node(id);
            (n.parent, n.side, n.left, n.right)
        };
        let child = left.or(right);

        if let Some(child) = child {
            let n = self.node_mut(child);
            n.parent = parent;
            n.side = side;
        }
        match parent {
            Some(p) => self.node_mut(p).set_child(side, child),
            None => self.root = child,
        }

        self.nodes.free(id);
        self.len -= 1;
        parent
    }

    // ─── Search and navigation ───────────────────────────────────────────────

    /// Standard BST descent. Returns the handle of the node holding `key`.
    pub(crate) fn find(&self, key: i64) -> Option<NodeId> {
        let mut cur = self.root;
        while let Some(id) = cur {
            let n = self.node(id);
            match key.cmp(&n.key) {
                Ordering::Equal => return Some(id),
                Ordering::Less => cur = n.left,
                Ordering::Greater => cur = n.right,
            }
        }
        None
    }

    fn min_in_subtree(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.node(id).left {
            id = left;
        }
        id
    }

    fn max_in_subtree(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.node(id).right {
            id = right;
        }
        id
    }

    /// Leftmost (minimum-key) node.
    pub(crate) fn first(&self) -> Option<NodeId> {
        self.root.map(|root| self.min_in_subtree(root))
    }

    /// Rightmost (maximum-key) node.
    pub(crate) fn last(&self) -> Option<NodeId> {
        self.root.map(|root| self.max_in_subtree(root))
    }

    /// Next node in sorted order: the leftmost node of the right subtree, or
    /// the first ancestor reached from a left child. `None` past the maximum.
    pub(crate) fn successor(&self, id: NodeId) -> Option<NodeId> {
        if let Some(right) = self.node(id).right {
            return Some(self.min_in_subtree(right));
        }
        let mut cur = id;
        loop {
            let n = self.node(cur);
            match n.side {
                Side::Root => return None,
                Side::Left => return n.parent,
                Side::Right => cur = n.parent?,
            }
        }
    }

    /// Previous node in sorted order; mirror of [`successor`](Self::successor).
    pub(crate) fn predecessor(&self, id: NodeId) -> Option<NodeId> {
        if let Some(left) = self.node(id).left {
            return Some(self.max_in_subtree(left));
        }
        let mut cur = id;
        loop {
            let n = self.node(cur);
            match n.side {
                Side::Root => return None,
                Side::Right => return n.parent,
                Side::Left => cur = n.parent?,
            }
        }
    }

    // ─── Order statistics ────────────────────────────────────────────────────

    /// Node at one-based `rank` within the subtree rooted at `id`: descend by
    /// subtree counts. `None` if `rank` is outside `1..=size(subtree)`.
    pub(crate) fn node_at_rank_in(&self, mut id: NodeId, mut rank: usize) -> Option<NodeId> {
        if rank == 0 || rank > to_usize(self.node(id).subtree_size()) {
            return None;
        }
        loop {
            let n = self.node(id);
            let left = to_usize(n.left_count);
            if rank == left + 1 {
                return Some(id);
            }
            if rank <= left {
                id = n.left?;
            } else {
                rank -= left + 1;
                id = n.right?;
            }
        }
    }

    /// Node at one-based `rank` within the whole tree.
    pub(crate) fn node_at_rank(&self, rank: usize) -> Option<NodeId> {
        self.root.and_then(|root| self.node_at_rank_in(root, rank))
    }

    /// One-based rank of `key` in the whole tree, accumulated during descent.
    pub(crate) fn rank_of(&self, key: i64) -> Option<usize> {
        let mut rank = 0usize;
        let mut cur = self.root;
        while let Some(id) = cur {
            let n = self.node(id);
            match key.cmp(&n.key) {
                Ordering::Less => cur = n.left,
                Ordering::Greater => {
                    rank += to_usize(n.left_count) + 1;
                    cur = n.right;
                }
                Ordering::Equal => return Some(rank + to_usize(n.left_count) + 1),
            }
        }
        None
    }

    /// Node `steps` positions ahead of `id` in sorted order, navigated via
    /// subtree counts and side markers in O(log n) rather than by repeated
    /// successor calls. Ascending from a right child consumes nothing (the
    /// parent was already passed); ascending from a left child consumes the
    /// parent and then its right subtree.
    pub(crate) fn nth_successor(&self, id: NodeId, steps: usize) -> Option<NodeId> {
        if steps == 0 {
            return Some(id);
        }

        {
            let n = self.node(id);
            if steps <= to_usize(n.right_count) {
                let right = n.right?;
                return self.node_at_rank_in(right, steps);
            }
        }

        // Steps that remain once this node's right subtree is exhausted.
        let mut remaining = steps - to_usize(self.node(id).right_count);
        let mut cur = id;
        loop {
            let n = self.node(cur);
            match n.side {
                Side::Root => return None,
                Side::Right => cur = n.parent?,
                Side::Left => {
                    let parent = n.parent?;
                    remaining -= 1;
                    if remaining == 0 {
                        return Some(parent);
                    }
                    let p = self.node(parent);
                    if remaining <= to_usize(p.right_count) {
                        let right = p.right?;
                        return self.node_at_rank_in(right, remaining);
                    }
                    remaining -= to_usize(p.right_count);
                    cur = parent;
                }
            }
        }
    }

    // ─── Diagnostics ─────────────────────────────────────────────────────────

    /// Renders one line per node in key order: key, height, children with
    /// subtree sizes, and the parent relationship. The walk is iterative; the
    /// balance invariant keeps the stack around log n deep.
    pub(crate) fn dump(&self) -> String {
        let mut out = String::new();
        let mut stack: SmallVec<[NodeId; 16]> = SmallVec::new();
        let mut cur = self.root;
        while cur.is_some() || !stack.is_empty() {
            while let Some(id) = cur {
                stack.push(id);
                cur = self.node(id).left;
            }
            let Some(id) = stack.pop() else { break };
            self.dump_node(&mut out, id);
            cur = self.node(id).right;
        }
        out
    }

    fn dump_node(&self, out: &mut String, id: NodeId) {
        let n = self.node(id);
        let _ = write!(out, "key: {}, height: {}", n.key, n.height);
        match n.left {
            Some(left) => {
                let l = self.node(left);
                let _ = write!(out, ", left: {} (size {})", l.key, l.subtree_size());
            }
            None => {
                let _ = write!(out, ", left: none");
            }
        }
        match n.right {
            Some(right) => {
                let r = self.node(right);
                let _ = write!(out, ", right: {} (size {})", r.key, r.subtree_size());
            }
            None => {
                let _ = write!(out, ", right: none");
            }
        }
        match (n.side, n.parent) {
            (Side::Left, Some(p)) => {
                let _ = writeln!(out, ", left child of {}", self.node(p).key);
            }
            (Side::Right, Some(p)) => {
                let _ = writeln!(out, ", right child of {}", self.node(p).key);
            }
            _ => {
                let _ = writeln!(out, ", root node");
            }
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
impl RawAvlTree {
    /// Validates every structural invariant from scratch. Panics with a
    /// descriptive message if any are violated; intended for tests only.
    pub(crate) fn validate_invariants(&self) {
        use alloc::format;
        use alloc::vec::Vec;

        let mut errors: Vec<String> = Vec::new();

        if let Some(root) = self.root {
            let n = self.node(root);
            if n.side != Side::Root {
                errors.push(format!("root {} has side {:?}", n.key, n.side));
            }
            if n.parent.is_some() {
                errors.push(format!("root {} has a parent", n.key));
            }

            let (_, size) = self.validate_node(root, &mut errors);
            if to_usize(size) != self.len {
                errors.push(format!("len mismatch: self.len={}, actual count={size}", self.len));
            }

            // Global BST order: walking the successor chain from the minimum
            // must yield strictly increasing keys and visit every node.
            let mut visited = 0usize;
            let mut cur = self.first();
            let mut prev: Option<i64> = None;
            while let Some(id) = cur {
                visited += 1;
                let key = self.node(id).key;
                if let Some(prev) = prev
                    && prev >= key
                {
                    errors.push(format!("in-order sequence not strictly increasing: {prev} before {key}"));
                }
                prev = Some(key);
                cur = self.successor(id);
            }
            if visited != self.len {
                errors.push(format!("successor chain visited {visited} nodes, len is {}", self.len));
            }
        } else if self.len != 0 {
            errors.push(format!("empty tree with len {}", self.len));
        }

        assert!(errors.is_empty(), "Tree invariant violations:\n{}", errors.join("\n"));
    }

    /// Returns (height, size) recomputed from scratch, checking the cached
    /// fields and the parent/side links of both children along the way.
    fn validate_node(&self, id: NodeId, errors: &mut alloc::vec::Vec<String>) -> (i8, u32) {
        use alloc::format;

        let n = self.node(id);

        let (lh, lsize) = match n.left {
            Some(left) => {
                let l = self.node(left);
                if l.parent != Some(id) {
                    errors.push(format!("left child {} of {} has wrong parent", l.key, n.key));
                }
                if l.side != Side::Left {
                    errors.push(format!("left child {} of {} has side {:?}", l.key, n.key, l.side));
                }
                if l.key >= n.key {
                    errors.push(format!("BST order violated: left child {} >= {}", l.key, n.key));
                }
                self.validate_node(left, errors)
            }
            None => (-1, 0),
        };
        let (rh, rsize) = match n.right {
            Some(right) => {
                let r = self.node(right);
                if r.parent != Some(id) {
                    errors.push(format!("right child {} of {} has wrong parent", r.key, n.key));
                }
                if r.side != Side::Right {
                    errors.push(format!("right child {} of {} has side {:?}", r.key, n.key, r.side));
                }
                if r.key <= n.key {
                    errors.push(format!("BST order violated: right child {} <= {}", r.key, n.key));
                }
                self.validate_node(right, errors)
            }
            None => (-1, 0),
        };

        if n.left_count != lsize {
            errors.push(format!("node {}: left_count={}, actual={lsize}", n.key, n.left_count));
        }
        if n.right_count != rsize {
            errors.push(format!("node {}: right_count={}, actual={rsize}", n.key, n.right_count));
        }
        let height = 1 + lh.max(rh);
        if n.height != height {
            errors.push(format!("node {}: height={}, actual={height}", n.key, n.height));
        }
        if lh.abs_diff(rh) > 1 {
            errors.push(format!("AVL balance violated at {}: heights {lh} and {rh}", n.key));
        }

        (height, lsize + rsize + 1)
    }
}
