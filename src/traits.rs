//! Capability traits implemented by [`KeyValueHeap`](crate::KeyValueHeap)
//!
//! Each capability is its own trait so that other containers can pick up
//! only the ones they need:
//!
//! - [`SlotContainer`]: a growable, counted container with bulk export
//! - [`Enumerable`]: a generation-tagged sequence that [`Enumerator`] can walk
//! - [`PartialState`]: state that is persisted in part and completed after load

use crate::enumerator::Enumerator;
use crate::error::HeapError;

/// A container of key-value slots whose live entries form a dense prefix.
pub trait SlotContainer<K, V> {
    /// Number of live entries.
    fn len(&self) -> usize;

    /// Returns true if there are no live entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of slots allocated for entries.
    fn capacity(&self) -> usize;

    /// Removes every entry, keeping the allocated slots.
    fn clear(&mut self);

    /// Clones every live entry into `dest`, starting at `offset`.
    ///
    /// Returns the number of entries written.
    ///
    /// # Errors
    /// Returns [`HeapError::InsufficientSpace`] if `dest[offset..]` is shorter
    /// than [`len`](Self::len). Nothing is written in that case.
    fn copy_to(&self, dest: &mut [(K, V)], offset: usize) -> Result<usize, HeapError>
    where
        K: Clone,
        V: Clone;
}

/// A sequence of entries tagged with a generation counter that changes on
/// every structural mutation.
pub trait Enumerable<K, V> {
    /// Current value of the generation counter.
    fn generation(&self) -> u64;

    /// Identity of this container, distinct from every other live container.
    fn instance(&self) -> u64;

    /// The entry stored at `index`, or `None` past the last live entry.
    fn entry_at(&self, index: usize) -> Option<(&K, &V)>;

    /// Starts a new enumeration session bound to this container and its
    /// current generation.
    fn enumerator(&self) -> Enumerator {
        Enumerator::new(self.instance(), self.generation())
    }
}

/// A type whose persisted form only captures part of its state.
///
/// Loading happens in two phases: [`from_state`](Self::from_state) rebuilds
/// the persisted part, the caller refills the rest, and
/// [`complete_restore`](Self::complete_restore) re-establishes the type's
/// invariants over the refilled data.
pub trait PartialState: Sized {
    /// The persisted part.
    type State;

    fn capture_state(&self) -> Self::State;

    fn from_state(state: Self::State) -> Self;

    fn complete_restore(&mut self);
}
