use core::num::NonZero;

/// A stable handle to a node in an [`AvlTree`](crate::AvlTree).
///
/// Internally this is an arena index stored with a +1 offset in a
/// `NonZero<u32>`, so `Option<NodeId>` occupies the same four bytes as
/// `NodeId` itself. Handles survive rotations and mutations of other keys;
/// a handle is invalidated when its node is removed from the tree (directly,
/// or as the spliced-out successor of a two-child deletion) or when the tree
/// is cleared. Using an invalidated handle panics.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(transparent)]
pub struct NodeId(NonZero<u32>);

impl NodeId {
    pub(crate) const MAX_INDEX: usize = (u32::MAX - 1) as usize;

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX_INDEX, "`NodeId::from_index()` - `index` > `NodeId::MAX_INDEX`!");
        // The +1 offset keeps zero free for the niche; it cannot overflow here.
        match NonZero::new(index as u32 + 1) {
            Some(raw) => Self(raw),
            None => unreachable!(),
        }
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}
