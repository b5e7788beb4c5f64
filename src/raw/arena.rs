use alloc::vec::Vec;

use super::handle::NodeId;

/// A slot in the arena: either a live element or a link in the free list.
#[derive(Clone)]
enum Slot<T> {
    Occupied(T),
    Free { next: Option<NodeId> },
}

/// Index arena with an intrusive free list threaded through vacant slots.
///
/// Freed slots are reused in LIFO order, so a `NodeId` is only ever dangling
/// until the next `alloc`; accessing a vacant slot panics.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<NodeId>,
    len: usize,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            len: 0,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            len: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn alloc(&mut self, element: T) -> NodeId {
        self.len += 1;
        if let Some(id) = self.free_head {
            // Reuse the most recently freed slot.
            match self.slots[id.index()] {
                Slot::Free { next } => self.free_head = next,
                Slot::Occupied(_) => panic!("`Arena::alloc()` - free list points at an occupied slot!"),
            }
            self.slots[id.index()] = Slot::Occupied(element);
            id
        } else {
            // `NodeId::from_index` rejects indices beyond the handle range, so
            // the arena can never silently outgrow its id space.
            self.slots.push(Slot::Occupied(element));
            NodeId::from_index(self.slots.len() - 1)
        }
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &T {
        match &self.slots[id.index()] {
            Slot::Occupied(element) => element,
            Slot::Free { .. } => panic!("`Arena::get()` - `id` is invalid!"),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut T {
        match &mut self.slots[id.index()] {
            Slot::Occupied(element) => element,
            Slot::Free { .. } => panic!("`Arena::get_mut()` - `id` is invalid!"),
        }
    }

    pub(crate) fn free(&mut self, id: NodeId) {
        let slot = core::mem::replace(&mut self.slots[id.index()], Slot::Free { next: self.free_head });
        match slot {
            Slot::Occupied(element) => drop(element),
            Slot::Free { .. } => panic!("`Arena::free()` - `id` is invalid!"),
        }
        self.free_head = Some(id);
        self.len -= 1;
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.len = 0;
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn arena_capacity() {
        let arena: Arena<u32> = Arena::with_capacity(10);
        assert_eq!(arena.capacity(), 10);
    }

    #[test]
    #[should_panic(expected = "`Arena::get()` - `id` is invalid!")]
    fn get_freed_slot_panics() {
        let mut arena: Arena<u32> = Arena::new();
        let id = arena.alloc(7);
        arena.free(id);
        let _ = arena.get(id);
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut arena: Arena<u32> = Arena::new();
        let a = arena.alloc(1);
        let b = arena.alloc(2);
        arena.free(a);
        arena.free(b);
        // LIFO reuse: `b`'s slot comes back first, then `a`'s.
        assert_eq!(arena.alloc(3), b);
        assert_eq!(arena.alloc(4), a);
        assert_eq!(arena.len(), 2);
    }

    proptest! {
        #[test]
        fn arena_behaves_like_vec(operations in prop::collection::vec(strategy(), 0..256)) {
            let mut model: Vec<(NodeId, u32)> = Vec::new();
            let mut arena: Arena<u32> = Arena::new();

            for operation in operations {
                match operation {
                    Operation::Alloc(value) => {
                        let id = arena.alloc(value);
                        model.push((id, value));
                    }
                    Operation::Get(which) => {
                        if model.is_empty() {
                            continue;
                        }

                        let index = which % model.len();
                        let id = model[index].0;
                        prop_assert_eq!(*arena.get(id), model[index].1);
                    }
                    Operation::GetMut(which, value) => {
                        if model.is_empty() {
                            continue;
                        }

                        let index = which % model.len();
                        let id = model[index].0;
                        *arena.get_mut(id) = value;
                        model[index].1 = value;
                    }
                    Operation::Free(which) => {
                        if model.is_empty() {
                            continue;
                        }

                        let index = which % model.len();
                        let id = model[index].0;
                        arena.free(id);
                        model.swap_remove(index);
                    }
                    Operation::Clear => {
                        arena.clear();
                        model.clear();
                    }
                }

                prop_assert_eq!(arena.len(), model.len());

                for &(id, value) in &model {
                    prop_assert_eq!(*arena.get(id), value);
                }
            }
        }
    }

    #[derive(Clone, Debug)]
    enum Operation {
        Alloc(u32),
        Get(usize),
        GetMut(usize, u32),
        Free(usize),
        Clear,
    }

    fn strategy() -> impl Strategy<Value = Operation> {
        prop_oneof![
            20 => any::<u32>().prop_map(Operation::Alloc),
            5 => any::<usize>().prop_map(Operation::Get),
            5 => (any::<usize>(), any::<u32>()).prop_map(|(which, value)| Operation::GetMut(which, value)),
            5 => any::<usize>().prop_map(Operation::Free),
            1 => Just(Operation::Clear),
        ]
    }
}
