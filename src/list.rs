//! Slot arena with index-linked doubly linked lists.
//!
//! Every node lives in a single [`SlotArena`]. A [`Bucket`] only records the
//! head, tail and length of one list threaded through that arena by slot id,
//! so many buckets can share one arena and a node can move from one bucket to
//! another without being reallocated: it is unlinked from the source list and
//! linked at the tail of the target list, both in O(1).
//!
//! ```text
//!   arena:  [0: a] [1: b] [2: -] [3: c] [4: d]      (2 is on the free list)
//!
//!   bucket(f=0): head ─► 0 ◄─► 3 ◄─ tail            (oldest first)
//!   bucket(f=1): head ─► 4 ◄─► 1 ◄─ tail
//! ```

extern crate alloc;

use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

/// Stable handle to an occupied slot in a [`SlotArena`].
///
/// Ids are reused after the slot is freed, so a handle must be dropped
/// together with the entry it points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SlotId(usize);

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

/// Vector-backed storage for list nodes with a free list for slot reuse.
#[derive(Debug)]
pub(crate) struct SlotArena<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    len: usize,
}

impl<T> SlotArena<T> {
    /// Creates an arena with room for `capacity` nodes before reallocating.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        SlotArena {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stores `value` in a fresh, unlinked node and returns its id.
    pub(crate) fn insert(&mut self, value: T) -> SlotId {
        let node = Node {
            value,
            prev: None,
            next: None,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };
        self.len += 1;
        SlotId(idx)
    }

    /// Frees the slot and returns its value.
    ///
    /// The node must already be unlinked from whatever bucket held it.
    pub(crate) fn remove(&mut self, id: SlotId) -> Option<T> {
        let node = self.slots.get_mut(id.0)?.take()?;
        debug_assert!(
            node.prev.is_none() && node.next.is_none(),
            "slot {} freed while still linked",
            id.0
        );
        self.free.push(id.0);
        self.len -= 1;
        Some(node.value)
    }

    #[inline]
    pub(crate) fn get(&self, id: SlotId) -> Option<&T> {
        self.node(id).map(|node| &node.value)
    }

    /// Returns the `(prev, next)` links of an occupied slot.
    pub(crate) fn links(&self, id: SlotId) -> Option<(Option<SlotId>, Option<SlotId>)> {
        self.node(id).map(|node| (node.prev, node.next))
    }

    /// Drops every node and forgets all slot ids.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.len = 0;
    }

    #[inline]
    fn node(&self, id: SlotId) -> Option<&Node<T>> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    #[inline]
    fn node_mut(&mut self, id: SlotId) -> &mut Node<T> {
        match self.slots.get_mut(id.0).and_then(Option::as_mut) {
            Some(node) => node,
            None => unreachable!("slot {} is vacant", id.0),
        }
    }
}

impl<T> Index<SlotId> for SlotArena<T> {
    type Output = T;

    fn index(&self, id: SlotId) -> &T {
        match self.node(id) {
            Some(node) => &node.value,
            None => unreachable!("slot {} is vacant", id.0),
        }
    }
}

impl<T> IndexMut<SlotId> for SlotArena<T> {
    fn index_mut(&mut self, id: SlotId) -> &mut T {
        &mut self.node_mut(id).value
    }
}

/// One doubly linked list threaded through a [`SlotArena`].
///
/// The head is the oldest arrival and the tail the newest.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Bucket {
    head: Option<SlotId>,
    tail: Option<SlotId>,
    len: usize,
}

impl Bucket {
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Oldest node in the list.
    #[inline]
    pub(crate) fn front(&self) -> Option<SlotId> {
        self.head
    }

    /// Newest node in the list.
    #[inline]
    pub(crate) fn back(&self) -> Option<SlotId> {
        self.tail
    }

    /// Links an unlinked node at the tail.
    pub(crate) fn push_back<T>(&mut self, arena: &mut SlotArena<T>, id: SlotId) {
        let old_tail = self.tail;
        {
            let node = arena.node_mut(id);
            debug_assert!(node.prev.is_none() && node.next.is_none());
            node.prev = old_tail;
            node.next = None;
        }
        match old_tail {
            Some(tail) => arena.node_mut(tail).next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        self.len += 1;
    }

    /// Unlinks `id`, which must belong to this list.
    pub(crate) fn unlink<T>(&mut self, arena: &mut SlotArena<T>, id: SlotId) {
        let (prev, next) = {
            let node = arena.node_mut(id);
            (node.prev.take(), node.next.take())
        };
        match prev {
            Some(prev) => arena.node_mut(prev).next = next,
            None => {
                debug_assert_eq!(self.head, Some(id), "unlinked node is not this list's head");
                self.head = next;
            }
        }
        match next {
            Some(next) => arena.node_mut(next).prev = prev,
            None => {
                debug_assert_eq!(self.tail, Some(id), "unlinked node is not this list's tail");
                self.tail = prev;
            }
        }
        self.len -= 1;
    }

    /// Unlinks and returns the oldest node.
    pub(crate) fn pop_front<T>(&mut self, arena: &mut SlotArena<T>) -> Option<SlotId> {
        let id = self.head?;
        self.unlink(arena, id);
        Some(id)
    }

    /// Iterates from the oldest node to the newest.
    pub(crate) fn iter<'a, T>(&self, arena: &'a SlotArena<T>) -> BucketIter<'a, T> {
        BucketIter {
            arena,
            next: self.head,
            remaining: self.len,
        }
    }
}

/// Iterator over one bucket, oldest arrival first.
#[derive(Debug)]
pub(crate) struct BucketIter<'a, T> {
    arena: &'a SlotArena<T>,
    next: Option<SlotId>,
    remaining: usize,
}

impl<'a, T> Iterator for BucketIter<'a, T> {
    type Item = (SlotId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = self.arena.node(id)?;
        self.next = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some((id, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}
