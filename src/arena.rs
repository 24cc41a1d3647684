//! Chunked slot storage for tree nodes.

use std::mem;
use std::ops::{Index, IndexMut};

/// A stable address of an object stored in an `Arena<T>`.
///
/// A handle stays valid until the object it points to is freed. After that the slot may be reused
/// by a later allocation, so a stale handle can resolve to an unrelated object.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Handle {
    chunk_index: usize,
    block_index: usize,
}

enum Slot<T> {
    Occupied(T),
    Vacant(Option<Handle>),
}

/// Storage for objects of a single type, handing out `Handle`s instead of references.
///
/// Objects live in fixed-capacity chunks, so growing the arena never moves existing objects.
/// Freed slots are threaded onto a free list and reused before a new chunk is allocated.
///
/// # Examples
///
/// ```
/// use splay_multimap::arena::Arena;
///
/// let mut arena = Arena::new(16);
///
/// let x = arena.allocate("a");
/// assert_eq!(arena[x], "a");
/// assert_eq!(arena.len(), 1);
///
/// assert_eq!(arena.free(&x), "a");
/// assert!(arena.is_empty());
/// ```
pub struct Arena<T> {
    head: Option<Handle>,
    chunks: Vec<Vec<Slot<T>>>,
    chunk_size: usize,
    len: usize,
    capacity: usize,
}

impl<T> Arena<T> {
    fn is_valid_handle(&self, handle: &Handle) -> bool {
        handle.chunk_index < self.chunks.len()
            && handle.block_index < self.chunks[handle.chunk_index].len()
    }

    /// Constructs a new, empty `Arena<T>` holding `chunk_size` objects per chunk. A `chunk_size`
    /// of zero is treated as one.
    pub fn new(chunk_size: usize) -> Self {
        Arena {
            head: None,
            chunks: Vec::new(),
            chunk_size: chunk_size.max(1),
            len: 0,
            capacity: 0,
        }
    }

    /// Returns the number of objects per chunk.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Returns the number of live objects in the arena.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena holds no live objects.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stores an object in the arena and returns its handle.
    pub fn allocate(&mut self, value: T) -> Handle {
        if self.len == self.capacity {
            self.chunks.push(Vec::with_capacity(self.chunk_size));
            self.capacity += self.chunk_size;
        }
        self.len += 1;

        match self.head.take() {
            None => {
                let chunk_count = self.chunks.len();
                let last_chunk = &mut self.chunks[chunk_count - 1];
                last_chunk.push(Slot::Occupied(value));
                Handle {
                    chunk_index: chunk_count - 1,
                    block_index: last_chunk.len() - 1,
                }
            },
            Some(handle) => {
                let vacant_slot = mem::replace(
                    &mut self.chunks[handle.chunk_index][handle.block_index],
                    Slot::Occupied(value),
                );
                match vacant_slot {
                    Slot::Vacant(next_handle) => {
                        self.head = next_handle;
                        handle
                    },
                    Slot::Occupied(_) => panic!("Error: free list points at an occupied slot."),
                }
            },
        }
    }

    /// Removes an object from the arena and returns it.
    ///
    /// # Panics
    ///
    /// Panics if the handle is out of bounds or points at a vacant slot.
    pub fn free(&mut self, handle: &Handle) -> T {
        if self.get(handle).is_none() {
            panic!("Error: attempting to free an invalid or vacant slot.");
        }
        let old_slot = mem::replace(
            &mut self.chunks[handle.chunk_index][handle.block_index],
            Slot::Vacant(self.head.take()),
        );
        match old_slot {
            Slot::Vacant(_) => unreachable!(),
            Slot::Occupied(value) => {
                self.len -= 1;
                self.head = Some(*handle);
                value
            },
        }
    }

    /// Returns an immutable reference to an object, or `None` if the handle does not point at a
    /// live object.
    pub fn get(&self, handle: &Handle) -> Option<&T> {
        if !self.is_valid_handle(handle) {
            return None;
        }
        match self.chunks[handle.chunk_index][handle.block_index] {
            Slot::Occupied(ref value) => Some(value),
            Slot::Vacant(_) => None,
        }
    }

    /// Returns a mutable reference to an object, or `None` if the handle does not point at a live
    /// object.
    pub fn get_mut(&mut self, handle: &Handle) -> Option<&mut T> {
        if !self.is_valid_handle(handle) {
            return None;
        }
        match self.chunks[handle.chunk_index][handle.block_index] {
            Slot::Occupied(ref mut value) => Some(value),
            Slot::Vacant(_) => None,
        }
    }

    /// Drops every object and releases all chunks.
    pub fn clear(&mut self) {
        self.head = None;
        self.chunks.clear();
        self.len = 0;
        self.capacity = 0;
    }
}

impl<T> Index<Handle> for Arena<T> {
    type Output = T;

    fn index(&self, handle: Handle) -> &Self::Output {
        self.get(&handle).expect("Error: handle does not point at a live object.")
    }
}

impl<T> IndexMut<Handle> for Arena<T> {
    fn index_mut(&mut self, handle: Handle) -> &mut Self::Output {
        self.get_mut(&handle).expect("Error: handle does not point at a live object.")
    }
}

#[cfg(test)]
mod tests {
    use super::{Arena, Handle};

    #[test]
    #[should_panic]
    fn test_free_invalid_slot() {
        let mut arena: Arena<u32> = Arena::new(16);
        arena.free(&Handle {
            chunk_index: 0,
            block_index: 0,
        });
    }

    #[test]
    #[should_panic]
    fn test_free_twice() {
        let mut arena = Arena::new(16);
        let handle = arena.allocate(0);
        arena.free(&handle);
        arena.free(&handle);
    }

    #[test]
    fn test_allocate_spills_into_new_chunk() {
        let mut arena = Arena::new(2);
        arena.allocate('a');
        arena.allocate('b');
        assert_eq!(
            arena.allocate('c'),
            Handle {
                chunk_index: 1,
                block_index: 0
            },
        );
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn test_free_reuses_slot() {
        let mut arena = Arena::new(4);
        let a = arena.allocate("a");
        let b = arena.allocate("b");
        assert_eq!(arena.free(&a), "a");
        assert_eq!(arena.get(&a), None);
        assert_eq!(arena.allocate("c"), a);
        assert_eq!(arena[a], "c");
        assert_eq!(arena[b], "b");
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_get_mut() {
        let mut arena = Arena::new(4);
        let handle = arena.allocate(1);
        *arena.get_mut(&handle).unwrap() += 1;
        arena[handle] += 1;
        assert_eq!(arena.get(&handle), Some(&3));
    }

    #[test]
    fn test_clear() {
        let mut arena = Arena::new(4);
        let handle = arena.allocate(1);
        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.get(&handle), None);
        assert_eq!(arena.chunk_size(), 4);
    }

    #[test]
    fn test_zero_chunk_size() {
        let mut arena = Arena::new(0);
        let a = arena.allocate(1);
        let b = arena.allocate(2);
        assert_eq!(arena[a] + arena[b], 3);
    }
}
