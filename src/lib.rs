//! A key-value binary heap whose order can be switched at runtime.
//!
//! [`KeyValueHeap`] stores `(key, value)` entries in a dense array-encoded
//! binary tree. Beyond the usual push/pop/peek it offers:
//!
//! - a [`HeapOrder`] (`Min` or `Max`) chosen at construction and changeable
//!   later with [`update_order`](KeyValueHeap::update_order),
//! - [`find_by_key`](KeyValueHeap::find_by_key), returning every entry whose
//!   key equals the search key (duplicate keys are allowed),
//! - a change-guarded [`Enumerator`] that fails instead of yielding data once
//!   the heap has been modified under it.
//!
//! The heap is a single-threaded structure; callers sharing one across threads
//! must provide their own locking.

#![allow(missing_docs)]

use core::fmt;
use core::iter::FusedIterator;
use core::mem::{swap, ManuallyDrop};
use core::ptr;
use core::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use std::slice;

mod enumerator;
mod error;
mod order;
mod state;
mod traits;

pub use enumerator::Enumerator;
pub use error::HeapError;
pub use order::{HeapOptions, HeapOrder, DEFAULT_MIN_CAPACITY};
pub use state::HeapState;
pub use traits::{Enumerable, PartialState, SlotContainer};

/// A single entry of a [`KeyValueHeap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeapNode<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> HeapNode<K, V> {
    pub fn new(key: K, value: V) -> Self {
        HeapNode { key, value }
    }

    /// Converts the node into a plain `(key, value)` pair.
    #[must_use]
    pub fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }

    /// Borrows the node as a `(key, value)` pair.
    #[must_use]
    pub fn as_pair(&self) -> (&K, &V) {
        (&self.key, &self.value)
    }
}

impl<K, V> From<(K, V)> for HeapNode<K, V> {
    fn from((key, value): (K, V)) -> Self {
        HeapNode::new(key, value)
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for HeapNode<K, V> {
    /// Renders the node as `[key:value]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}]", self.key, self.value)
    }
}

/// A priority queue of key-value entries implemented with a binary heap.
///
/// Whether the smallest or the greatest key sits at the root is decided by
/// the heap's [`HeapOrder`], which can be changed at any time with
/// [`update_order`](KeyValueHeap::update_order). Keys may repeat.
///
/// Keys only need [`PartialOrd`]. A key that cannot be ordered against itself
/// (such as `f64::NAN`) is rejected with [`HeapError::InvalidKey`].
///
/// It is a logic error for a key to be modified in such a way that its
/// ordering relative to any other key changes while it is in the heap. This
/// is normally only possible through [`Cell`], [`RefCell`], global state, I/O,
/// or unsafe code. The behavior resulting from such a logic error is not
/// specified but will not be undefined behavior.
///
/// Every structural mutation (push, extraction, clear, re-order) advances a
/// generation counter. Read-only operations never touch it.
///
/// # Examples
///
/// ```
/// use ordered_kv_heap::{HeapOrder, KeyValueHeap};
///
/// let mut heap = KeyValueHeap::new(HeapOrder::Min);
///
/// // There's nothing to peek at yet.
/// assert_eq!(heap.peek(), None);
///
/// heap.push(5, "Alice").unwrap();
/// heap.push(1, "Bob").unwrap();
/// heap.push(2, "Eve").unwrap();
///
/// assert_eq!(heap.peek(), Some((&1, &"Bob")));
/// assert_eq!(heap.len(), 3);
///
/// // Iteration walks the storage, not the sorted order.
/// for (key, value) in &heap {
///     println!("{key}: {value}");
/// }
///
/// assert_eq!(heap.extract(), Ok((1, "Bob")));
///
/// // Flip to a max-heap; the remaining entries are rebuilt.
/// heap.update_order(HeapOrder::Max, false);
/// assert_eq!(heap.pop(), Some((5, "Alice")));
/// assert_eq!(heap.pop(), Some((2, "Eve")));
/// assert_eq!(heap.pop(), None);
/// ```
///
/// # Time complexity
///
/// | [push]        | [pop]         | [peek] | [find_by_key] | [update_order]     |
/// |---------------|---------------|--------|---------------|--------------------|
/// | *O*(log(*n*)) | *O*(log(*n*)) | *O*(1) | *O*(*n*)      | *O*(*n* log(*n*)) |
///
/// `push` is amortized over storage growth. `find_by_key` prunes subtrees
/// that cannot hold the key, but degrades to visiting every entry when most
/// keys match.
///
/// [`Cell`]: core::cell::Cell
/// [`RefCell`]: core::cell::RefCell
/// [push]: KeyValueHeap::push
/// [pop]: KeyValueHeap::pop
/// [peek]: KeyValueHeap::peek
/// [find_by_key]: KeyValueHeap::find_by_key
/// [update_order]: KeyValueHeap::update_order
pub struct KeyValueHeap<K, V> {
    data: Vec<HeapNode<K, V>>,
    /// Slots reserved by the growth policy. `data.capacity()` may exceed it.
    capacity: usize,
    min_capacity: usize,
    order: HeapOrder,
    generation: u64,
    /// Identity handed to enumeration sessions. Unique per heap, clones included.
    instance: u64,
}

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(0);

fn next_instance() -> u64 {
    NEXT_INSTANCE.fetch_add(1, AtomicOrdering::Relaxed)
}

impl<K: Clone, V: Clone> Clone for KeyValueHeap<K, V> {
    fn clone(&self) -> Self {
        let mut data = Vec::with_capacity(self.capacity);
        data.extend(self.data.iter().cloned());
        KeyValueHeap {
            data,
            capacity: self.capacity,
            min_capacity: self.min_capacity,
            order: self.order,
            generation: self.generation,
            instance: next_instance(),
        }
    }
}

impl<K: PartialOrd, V> Default for KeyValueHeap<K, V> {
    /// Creates an empty min-heap.
    #[inline]
    fn default() -> KeyValueHeap<K, V> {
        KeyValueHeap::new(HeapOrder::Min)
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for KeyValueHeap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyValueHeap")
            .field("order", &self.order)
            .field("len", &self.data.len())
            .field("entries", &self.data)
            .finish()
    }
}

#[inline]
fn is_valid_key<K: PartialOrd + ?Sized>(key: &K) -> bool {
    key.partial_cmp(key).is_some()
}

#[allow(unused_unsafe)]
impl<K: PartialOrd, V> KeyValueHeap<K, V> {
    /// Creates an empty `KeyValueHeap` with the given order.
    ///
    /// No storage is allocated until the first push.
    ///
    /// ```
    /// use ordered_kv_heap::{HeapOrder, KeyValueHeap};
    /// let mut heap = KeyValueHeap::new(HeapOrder::Max);
    /// heap.push(4, "Steven").unwrap();
    /// ```
    #[must_use]
    pub fn new(order: HeapOrder) -> KeyValueHeap<K, V> {
        KeyValueHeap::with_options(HeapOptions::with_order(order))
    }

    /// Creates an empty `KeyValueHeap` from [`HeapOptions`].
    #[must_use]
    pub fn with_options(options: HeapOptions) -> KeyValueHeap<K, V> {
        KeyValueHeap {
            data: Vec::new(),
            capacity: 0,
            min_capacity: options.min_capacity.max(1),
            order: options.order,
            generation: 0,
            instance: next_instance(),
        }
    }

    /// Creates an empty `KeyValueHeap` with room for `capacity` entries
    /// before the first reallocation.
    ///
    /// ```
    /// use ordered_kv_heap::{HeapOrder, KeyValueHeap};
    /// let mut heap = KeyValueHeap::with_capacity(HeapOrder::Min, 10);
    /// heap.push(4, "Eve").unwrap();
    /// assert_eq!(heap.capacity(), 10);
    /// ```
    #[must_use]
    pub fn with_capacity(order: HeapOrder, capacity: usize) -> KeyValueHeap<K, V> {
        let mut heap = KeyValueHeap::new(order);
        heap.data.reserve_exact(capacity);
        heap.capacity = capacity;
        heap
    }

    /// Creates a heap and pushes every pair of `source` into it, in order.
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::InvalidKey`] on the first key that cannot be
    /// ordered against itself.
    ///
    /// ```
    /// use ordered_kv_heap::{HeapOrder, KeyValueHeap};
    ///
    /// let heap = KeyValueHeap::from_entries(HeapOrder::Max, [(1, "a"), (3, "c"), (2, "b")]).unwrap();
    /// assert_eq!(heap.peek(), Some((&3, &"c")));
    /// ```
    pub fn from_entries<I>(order: HeapOrder, source: I) -> Result<KeyValueHeap<K, V>, HeapError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut heap = KeyValueHeap::new(order);
        for (key, value) in source {
            heap.push(key, value)?;
        }
        Ok(heap)
    }

    /// Pushes an entry onto the heap.
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::InvalidKey`] if `key` cannot be ordered against
    /// itself. The heap is left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_kv_heap::{HeapError, HeapOrder, KeyValueHeap};
    ///
    /// let mut heap = KeyValueHeap::new(HeapOrder::Max);
    /// heap.push(3.0, "Bob").unwrap();
    /// heap.push(5.0, "Alice").unwrap();
    /// assert_eq!(heap.push(f64::NAN, "Eve"), Err(HeapError::InvalidKey));
    ///
    /// assert_eq!(heap.len(), 2);
    /// assert_eq!(heap.peek(), Some((&5.0, &"Alice")));
    /// ```
    ///
    /// # Time complexity
    ///
    /// *O*(log(*n*)) comparisons. A push that exhausts the reserved slots
    /// first grows the storage, which costs *O*(*n*) but is amortized over
    /// the pushes that preceded it.
    pub fn push(&mut self, key: K, value: V) -> Result<(), HeapError> {
        if !is_valid_key(&key) {
            return Err(HeapError::InvalidKey);
        }
        self.push_node(HeapNode::new(key, value));
        Ok(())
    }

    fn push_node(&mut self, node: HeapNode<K, V>) {
        self.reserve_slot();
        let old_len = self.len();
        self.data.push(node);
        // SAFETY: old_len is the index of the node just pushed.
        unsafe { self.sift_up(0, old_len) };
        self.bump_generation();
    }

    /// Removes the root entry and returns it, or `None` if the heap is empty.
    ///
    /// ```
    /// use ordered_kv_heap::KeyValueHeap;
    /// let mut heap = KeyValueHeap::from([(1, "a"), (3, "c")]);
    ///
    /// assert_eq!(heap.pop(), Some((1, "a")));
    /// assert_eq!(heap.pop(), Some((3, "c")));
    /// assert_eq!(heap.pop(), None);
    /// ```
    ///
    /// # Time complexity
    ///
    /// The worst case cost of `pop` on a heap containing *n* elements is *O*(log(*n*)).
    pub fn pop(&mut self) -> Option<(K, V)> {
        let mut item = self.data.pop()?;
        if !self.is_empty() {
            swap(&mut item, &mut self.data[0]);
            // SAFETY: the heap is non-empty.
            unsafe { self.sift_down(0) };
        }
        self.bump_generation();
        Some(item.into_pair())
    }

    /// Removes the root entry and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::Empty`] if there is nothing to extract.
    ///
    /// ```
    /// use ordered_kv_heap::{HeapError, HeapOrder, KeyValueHeap};
    ///
    /// let mut heap: KeyValueHeap<i32, ()> = KeyValueHeap::new(HeapOrder::Min);
    /// assert_eq!(heap.extract(), Err(HeapError::Empty));
    ///
    /// heap.push(1, ()).unwrap();
    /// assert_eq!(heap.extract(), Ok((1, ())));
    /// ```
    pub fn extract(&mut self) -> Result<(K, V), HeapError> {
        self.pop().ok_or(HeapError::Empty)
    }

    /// Returns every entry whose key equals `key`, in no particular order.
    ///
    /// Equality is the key's own `==`, independent of the heap's order. The
    /// search walks the tree from the root and skips any subtree whose root
    /// already ranks after `key`.
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::InvalidKey`] if `key` cannot be ordered against
    /// itself.
    ///
    /// ```
    /// use ordered_kv_heap::{HeapOrder, KeyValueHeap};
    ///
    /// let mut heap = KeyValueHeap::new(HeapOrder::Max);
    /// heap.push(7, "first").unwrap();
    /// heap.push(9, "other").unwrap();
    /// heap.push(7, "second").unwrap();
    ///
    /// let mut found = heap.find_by_key(&7).unwrap();
    /// found.sort();
    /// assert_eq!(found, [(&7, &"first"), (&7, &"second")]);
    /// assert!(heap.find_by_key(&8).unwrap().is_empty());
    /// ```
    pub fn find_by_key(&self, key: &K) -> Result<Vec<(&K, &V)>, HeapError> {
        if !is_valid_key(key) {
            return Err(HeapError::InvalidKey);
        }

        let mut found = Vec::new();
        let mut pending = Vec::new();
        if !self.is_empty() {
            pending.push(0);
        }

        while let Some(i) = pending.pop() {
            let Some(node) = self.data.get(i) else {
                continue;
            };
            // No descendant of a node ranks before the node itself.
            if self.order.is_better(key, &node.key) {
                continue;
            }
            if node.key == *key {
                found.push(node.as_pair());
            }
            pending.push(2 * i + 2);
            pending.push(2 * i + 1);
        }

        Ok(found)
    }

    /// Returns `true` if the exact `(key, value)` entry is stored in the heap.
    ///
    /// ```
    /// use ordered_kv_heap::{HeapOrder, KeyValueHeap};
    ///
    /// let heap = KeyValueHeap::from_entries(HeapOrder::Min, [(1, "a"), (1, "b")]).unwrap();
    /// assert!(heap.contains(&1, &"b"));
    /// assert!(!heap.contains(&1, &"c"));
    /// ```
    pub fn contains(&self, key: &K, value: &V) -> bool
    where
        V: PartialEq,
    {
        match self.find_by_key(key) {
            Ok(found) => found.iter().any(|&(_, v)| v == value),
            Err(_) => false,
        }
    }

    /// Switches the heap to `order` and rebuilds it.
    ///
    /// Nothing happens if `order` is already active, unless `force` is set.
    /// Forcing a rebuild under the current order re-establishes the heap
    /// property over entries that were loaded without it (see
    /// [`restore_entries`](KeyValueHeap::restore_entries)).
    ///
    /// Every stored entry, duplicates included, survives the rebuild.
    ///
    /// ```
    /// use ordered_kv_heap::{HeapOrder, KeyValueHeap};
    ///
    /// let mut heap = KeyValueHeap::from([(1, "a"), (5, "e"), (3, "c")]);
    /// heap.update_order(HeapOrder::Max, false);
    ///
    /// assert_eq!(heap.order(), HeapOrder::Max);
    /// assert_eq!(heap.into_sorted_vec(), [(5, "e"), (3, "c"), (1, "a")]);
    /// ```
    ///
    /// # Time complexity
    ///
    /// *O*(*n* log(*n*)) for a non-empty heap, *O*(1) otherwise.
    pub fn update_order(&mut self, order: HeapOrder, force: bool) {
        if order == self.order && !force {
            return;
        }
        if self.is_empty() {
            self.order = order;
            self.bump_generation();
            return;
        }

        tracing::debug!(
            from = ?self.order,
            to = ?order,
            len = self.len(),
            force,
            "rebuilding heap"
        );

        let entries: Vec<_> = self.data.drain(..).collect();
        self.clear();
        self.order = order;
        for node in entries {
            self.push_node(node);
        }
    }

    /// Checks that no entry ranks before its parent under the active order.
    #[must_use]
    pub fn check_integrity(&self) -> bool {
        (1..self.data.len()).all(|i| {
            let parent = (i - 1) / 2;
            !self.order.is_better(&self.data[i].key, &self.data[parent].key)
        })
    }

    /// Consumes the heap and returns its entries in extraction order:
    /// ascending keys for a min-heap, descending for a max-heap.
    ///
    /// ```
    /// use ordered_kv_heap::KeyValueHeap;
    ///
    /// let mut heap = KeyValueHeap::from([(2, 'b'), (4, 'd'), (1, 'a')]);
    /// heap.push(3, 'c').unwrap();
    ///
    /// assert_eq!(heap.into_sorted_vec(), [(1, 'a'), (2, 'b'), (3, 'c'), (4, 'd')]);
    /// ```
    #[must_use = "`self` will be dropped if the result is not used"]
    pub fn into_sorted_vec(mut self) -> Vec<(K, V)> {
        let mut end = self.len();
        while end > 1 {
            end -= 1;
            // Park the current best entry behind the shrinking heap prefix.
            self.data.swap(0, end);
            // SAFETY: 0 < end < self.len().
            unsafe { self.sift_down_range(0, end) };
        }
        // The best entry was parked last.
        self.data.reverse();
        self.into_vec()
    }

    /// Returns an iterator that extracts entries in heap order.
    /// This method consumes the original heap.
    ///
    /// ```
    /// use ordered_kv_heap::{HeapOrder, KeyValueHeap};
    ///
    /// let heap = KeyValueHeap::from_entries(HeapOrder::Max, [(1, ()), (5, ()), (3, ())]).unwrap();
    /// let keys: Vec<_> = heap.into_iter_sorted().map(|(key, _)| key).take(2).collect();
    /// assert_eq!(keys, [5, 3]);
    /// ```
    pub fn into_iter_sorted(self) -> IntoIterSorted<K, V> {
        IntoIterSorted { inner: self }
    }

    // Sifting moves a `Hole` through the tree instead of swapping nodes. The
    // final layout is the same as swapping at every step.

    /// Take the element at `pos` and move it up the heap while its parent
    /// ranks strictly after it.
    ///
    /// # Safety
    ///
    /// The caller must guarantee that `pos < self.len()`.
    unsafe fn sift_up(&mut self, start: usize, pos: usize) -> usize {
        let order = self.order;
        // SAFETY: pos < self.len() by contract.
        let mut hole = unsafe { Hole::new(&mut self.data, pos) };

        while hole.pos() > start {
            let parent = (hole.pos() - 1) / 2;

            // SAFETY: parent < hole.pos().
            if !order.is_better(&hole.element().key, unsafe { &hole.get(parent).key }) {
                break;
            }

            unsafe { hole.move_to(parent) };
        }

        hole.pos()
    }

    /// Take the element at `pos` and move it down the heap while one of its
    /// children ranks strictly before it.
    ///
    /// The hole follows the better child. On a tie between the two children
    /// it follows the left one.
    ///
    /// # Safety
    ///
    /// The caller must guarantee that `pos < end <= self.len()`.
    unsafe fn sift_down_range(&mut self, pos: usize, end: usize) {
        let order = self.order;
        // SAFETY: pos < end <= self.len() by contract.
        let mut hole = unsafe { Hole::new(&mut self.data, pos) };
        let mut child = 2 * hole.pos() + 1;

        // Loop invariant: child == 2 * hole.pos() + 1.
        while child <= end.saturating_sub(2) {
            // SAFETY: both children lie below `end` and past the hole.
            // The right child wins only when strictly better.
            child += unsafe { order.is_better(&hole.get(child + 1).key, &hole.get(child).key) } as usize;

            if !order.is_better(unsafe { &hole.get(child).key }, &hole.element().key) {
                return;
            }

            unsafe { hole.move_to(child) };
            child = 2 * hole.pos() + 1;
        }

        // A lone left child at the end of the range.
        if child == end - 1 && order.is_better(unsafe { &hole.get(child).key }, &hole.element().key) {
            unsafe { hole.move_to(child) };
        }
    }

    /// # Safety
    ///
    /// The caller must guarantee that `pos < self.len()`.
    unsafe fn sift_down(&mut self, pos: usize) {
        let len = self.len();
        unsafe { self.sift_down_range(pos, len) };
    }
}

impl<K, V> KeyValueHeap<K, V> {
    /// Guarantees a free slot for the next push, growing the reserved
    /// storage by half when it is full.
    fn reserve_slot(&mut self) {
        let len = self.data.len();
        if len < self.capacity {
            return;
        }

        let old_capacity = self.capacity;
        let new_capacity = if old_capacity == 0 {
            self.min_capacity
        } else {
            old_capacity
                .saturating_add(old_capacity / 2)
                .max(old_capacity + 1)
        };
        self.data.reserve_exact(new_capacity - len);
        self.capacity = new_capacity;

        tracing::trace!(old_capacity, new_capacity, "growing heap storage");
    }

    #[inline]
    fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Returns an iterator visiting all entries in storage order.
    ///
    /// Storage order is breadth-first over the heap tree: the root comes
    /// first, but the rest is not sorted.
    ///
    /// ```
    /// use ordered_kv_heap::KeyValueHeap;
    /// let heap = KeyValueHeap::from([(1, "a"), (2, "b"), (3, "c")]);
    ///
    /// assert_eq!(heap.iter().next(), Some((&1, &"a")));
    /// assert_eq!(heap.iter().count(), 3);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            iter: self.data.iter(),
        }
    }

    /// Returns the root entry, or `None` if the heap is empty.
    ///
    /// ```
    /// use ordered_kv_heap::{HeapOrder, KeyValueHeap};
    /// let mut heap = KeyValueHeap::new(HeapOrder::Max);
    /// assert_eq!(heap.peek(), None);
    ///
    /// heap.push(1, "Bob").unwrap();
    /// heap.push(5, "Alice").unwrap();
    /// assert_eq!(heap.peek(), Some((&5, &"Alice")));
    /// ```
    ///
    /// # Time complexity
    ///
    /// Cost is *O*(1) in the worst case.
    #[must_use]
    pub fn peek(&self) -> Option<(&K, &V)> {
        self.data.first().map(HeapNode::as_pair)
    }

    /// The active order.
    #[must_use]
    pub fn order(&self) -> HeapOrder {
        self.order
    }

    /// Current value of the generation counter. It changes on every
    /// structural mutation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the number of slots reserved for entries.
    ///
    /// The first push reserves the configured minimum (4 by default); a full
    /// heap grows by half. Capacity never shrinks, not even on
    /// [`clear`](KeyValueHeap::clear).
    ///
    /// ```
    /// use ordered_kv_heap::{HeapOrder, KeyValueHeap};
    /// let mut heap = KeyValueHeap::new(HeapOrder::Min);
    /// assert_eq!(heap.capacity(), 0);
    ///
    /// for key in 0..5 {
    ///     heap.push(key, ()).unwrap();
    /// }
    /// assert_eq!(heap.capacity(), 6);
    /// ```
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of entries in the heap.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Checks if the heap is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry, keeping the reserved storage.
    ///
    /// ```
    /// use ordered_kv_heap::KeyValueHeap;
    /// let mut heap = KeyValueHeap::from([(1, ()), (3, ())]);
    /// let capacity = heap.capacity();
    ///
    /// heap.clear();
    ///
    /// assert!(heap.is_empty());
    /// assert_eq!(heap.capacity(), capacity);
    /// ```
    pub fn clear(&mut self) {
        self.data.clear();
        self.bump_generation();
    }

    /// Clones every entry, in storage order, into `dest` starting at `offset`,
    /// and returns how many were written.
    ///
    /// Only live entries are copied; the unused tail of the storage is never
    /// exposed.
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::InsufficientSpace`] if `dest[offset..]` cannot
    /// hold every entry. `dest` is left untouched.
    ///
    /// ```
    /// use ordered_kv_heap::KeyValueHeap;
    ///
    /// let heap = KeyValueHeap::from([(2, 'b'), (1, 'a')]);
    /// let mut dest = [(0, '-'); 3];
    ///
    /// assert_eq!(heap.copy_to(&mut dest, 1), Ok(2));
    /// assert_eq!(dest, [(0, '-'), (1, 'a'), (2, 'b')]);
    /// ```
    pub fn copy_to(&self, dest: &mut [(K, V)], offset: usize) -> Result<usize, HeapError>
    where
        K: Clone,
        V: Clone,
    {
        let required = self.len();
        let available = dest.len().saturating_sub(offset);
        match dest.get_mut(offset..) {
            Some(tail) if tail.len() >= required => {
                for (slot, node) in tail.iter_mut().zip(&self.data) {
                    *slot = (node.key.clone(), node.value.clone());
                }
                Ok(required)
            }
            _ => Err(HeapError::InsufficientSpace {
                offset,
                required,
                available,
            }),
        }
    }

    /// Consumes the heap and returns its entries in storage order.
    #[must_use = "`self` will be dropped if the result is not used"]
    pub fn into_vec(self) -> Vec<(K, V)> {
        self.data.into_iter().map(HeapNode::into_pair).collect()
    }
}

impl<K, V> SlotContainer<K, V> for KeyValueHeap<K, V> {
    fn len(&self) -> usize {
        KeyValueHeap::len(self)
    }

    fn capacity(&self) -> usize {
        KeyValueHeap::capacity(self)
    }

    fn clear(&mut self) {
        KeyValueHeap::clear(self);
    }

    fn copy_to(&self, dest: &mut [(K, V)], offset: usize) -> Result<usize, HeapError>
    where
        K: Clone,
        V: Clone,
    {
        KeyValueHeap::copy_to(self, dest, offset)
    }
}

impl<K, V> Enumerable<K, V> for KeyValueHeap<K, V> {
    fn generation(&self) -> u64 {
        self.generation
    }

    fn instance(&self) -> u64 {
        self.instance
    }

    fn entry_at(&self, index: usize) -> Option<(&K, &V)> {
        self.data.get(index).map(HeapNode::as_pair)
    }
}

/// A slot whose node has been moved out during sifting. Dropping the `Hole`
/// writes that node back into the slot it ends up at.
struct Hole<'a, T: 'a> {
    data: &'a mut [T],
    elt: ManuallyDrop<T>,
    pos: usize,
}

impl<'a, T> Hole<'a, T> {
    /// `pos` must be within `data`.
    #[inline]
    #[allow(unused_unsafe)]
    unsafe fn new(data: &'a mut [T], pos: usize) -> Self {
        debug_assert!(pos < data.len());
        let elt = unsafe { ptr::read(data.get_unchecked(pos)) };
        Hole {
            data,
            elt: ManuallyDrop::new(elt),
            pos,
        }
    }

    #[inline]
    fn pos(&self) -> usize {
        self.pos
    }

    /// The node taken out of the slot.
    #[inline]
    fn element(&self) -> &T {
        &self.elt
    }

    /// `index` must be within `data` and differ from the hole.
    #[inline]
    #[allow(unused_unsafe)]
    unsafe fn get(&self, index: usize) -> &T {
        debug_assert!(index != self.pos);
        debug_assert!(index < self.data.len());
        unsafe { self.data.get_unchecked(index) }
    }

    /// Moves the node at `index` into the hole. Same contract as `get`.
    #[inline]
    #[allow(unused_unsafe)]
    unsafe fn move_to(&mut self, index: usize) {
        debug_assert!(index != self.pos);
        debug_assert!(index < self.data.len());
        unsafe {
            let ptr = self.data.as_mut_ptr();
            let index_ptr: *const _ = ptr.add(index);
            let hole_ptr = ptr.add(self.pos);
            ptr::copy_nonoverlapping(index_ptr, hole_ptr, 1);
        }
        self.pos = index;
    }
}

impl<T> Drop for Hole<'_, T> {
    #[inline]
    fn drop(&mut self) {
        unsafe {
            let pos = self.pos;
            ptr::copy_nonoverlapping(&*self.elt, self.data.get_unchecked_mut(pos), 1);
        }
    }
}

/// An iterator over the entries of a `KeyValueHeap`, in storage order.
///
/// This `struct` is created by [`KeyValueHeap::iter()`]. The borrow it holds
/// rules out mutation while it is alive; use an [`Enumerator`] to walk a heap
/// that may be modified between steps.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K: 'a, V: 'a> {
    iter: slice::Iter<'a, HeapNode<K, V>>,
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.iter.as_slice()).finish()
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            iter: self.iter.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        self.iter.next().map(HeapNode::as_pair)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }

    #[inline]
    fn last(self) -> Option<(&'a K, &'a V)> {
        self.iter.last().map(HeapNode::as_pair)
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<(&'a K, &'a V)> {
        self.iter.next_back().map(HeapNode::as_pair)
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// An owning iterator that extracts entries in heap order.
///
/// This `struct` is created by [`KeyValueHeap::into_iter_sorted()`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
#[derive(Clone, Debug)]
pub struct IntoIterSorted<K, V> {
    inner: KeyValueHeap<K, V>,
}

impl<K: PartialOrd, V> Iterator for IntoIterSorted<K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<(K, V)> {
        self.inner.pop()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let exact = self.inner.len();
        (exact, Some(exact))
    }
}

impl<K: PartialOrd, V> ExactSizeIterator for IntoIterSorted<K, V> {}

impl<K: PartialOrd, V> FusedIterator for IntoIterSorted<K, V> {}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for KeyValueHeap<K, V> {
    /// Builds a min-heap from an array of pairs.
    ///
    /// ```
    /// use ordered_kv_heap::{HeapOrder, KeyValueHeap};
    ///
    /// let heap = KeyValueHeap::from([(3, "c"), (1, "a"), (2, "b")]);
    /// assert_eq!(heap.order(), HeapOrder::Min);
    /// assert_eq!(heap.peek(), Some((&1, &"a")));
    /// ```
    fn from(arr: [(K, V); N]) -> Self {
        Self::from_iter(arr)
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for KeyValueHeap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> KeyValueHeap<K, V> {
        let mut heap = KeyValueHeap::new(HeapOrder::Min);
        heap.extend(iter);
        heap
    }
}

impl<K: Ord, V> Extend<(K, V)> for KeyValueHeap<K, V> {
    #[inline]
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        // Totally ordered keys are always comparable with themselves.
        iter.into_iter()
            .for_each(move |(key, value)| self.push_node(HeapNode::new(key, value)));
    }
}

impl<'a, K, V> IntoIterator for &'a KeyValueHeap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}
